/// Database models
///
/// Each model is a `sqlx::FromRow` struct with associated functions for its
/// queries. JSON field names match what storefront clients expect
/// (`fullName`, `CityId`, `OrderDetails`, ...).
///
/// - `user`: Accounts and profile details
/// - `city`: City reference data
/// - `category`: Product categories
/// - `product`: Catalog entries
/// - `order`: Orders, order status and the cart lifecycle
/// - `order_detail`: Order lines
///
/// # Example
///
/// ```no_run
/// use storefront_shared::models::order::{Order, OrderStatus};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// if let Some(cart) = Order::find_with_details(&pool, 1, OrderStatus::OnCart).await? {
///     println!("{} lines in cart", cart.order_details.len());
/// }
/// # Ok(())
/// # }
/// ```

pub mod category;
pub mod city;
pub mod order;
pub mod order_detail;
pub mod product;
pub mod user;

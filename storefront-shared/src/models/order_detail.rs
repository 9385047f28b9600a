/// Order lines
///
/// Each row is one product in one size inside an order. Lines can only be
/// changed or removed while their order is still the user's cart; the
/// ownership and status checks are part of the write statement itself.
///
/// # Example
///
/// ```no_run
/// use storefront_shared::models::order::CartOutcome;
/// use storefront_shared::models::order_detail::OrderDetail;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, user_id: i32) -> Result<(), sqlx::Error> {
/// let Some(line) = OrderDetail::add_to_cart(&pool, user_id, 10, "L").await? else {
///     return Ok(()); // no such product
/// };
///
/// match OrderDetail::update_size(&pool, line.id, user_id, "XL").await? {
///     CartOutcome::Applied(line) => println!("now {}", line.size),
///     CartOutcome::NotFound => println!("no such line"),
///     CartOutcome::NotOnCart => println!("order already paid"),
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use tracing::info;

use super::order::{CartOutcome, Order, OrderStatus};
use super::product::{Product, PRODUCT_COLUMNS};

const DETAIL_COLUMNS: &str = "id, order_id, product_id, size, created_at, updated_at";

/// Longest size label a line may carry
pub const MAX_SIZE_LENGTH: usize = 20;

/// Prefixes each column in a comma separated list with a table alias
fn qualify(alias: &str, columns: &str) -> String {
    columns
        .split(", ")
        .map(|column| format!("{}.{}", alias, column))
        .collect::<Vec<_>>()
        .join(", ")
}

/// An order line row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: i32,

    #[serde(rename = "OrderId")]
    pub order_id: i32,

    #[serde(rename = "ProductId")]
    pub product_id: i32,

    pub size: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line as shown to the buyer: its ID, size and full product
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderDetailWithProduct {
    #[sqlx(rename = "detail_id")]
    pub id: i32,

    #[sqlx(rename = "detail_size")]
    pub size: String,

    #[serde(rename = "Product")]
    #[sqlx(flatten)]
    pub product: Product,
}

impl OrderDetail {
    /// Inserts a line into an order
    pub async fn create<'e, E>(
        executor: E,
        order_id: i32,
        product_id: i32,
        size: &str,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO order_details (order_id, product_id, size) VALUES ($1, $2, $3) RETURNING {}",
            DETAIL_COLUMNS
        );

        sqlx::query_as::<_, OrderDetail>(&query)
            .bind(order_id)
            .bind(product_id)
            .bind(size)
            .fetch_one(executor)
            .await
    }

    /// Adds a product to the user's cart, creating the cart if needed
    ///
    /// Every call adds a new line; identical lines are not merged. The
    /// product check, cart lookup and insert share one transaction.
    ///
    /// # Returns
    ///
    /// The new line, or `None` if the product does not exist
    pub async fn add_to_cart(
        pool: &PgPool,
        user_id: i32,
        product_id: i32,
        size: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !Product::exists(&mut *tx, product_id).await? {
            return Ok(None);
        }

        let cart = Order::find_or_create_cart(&mut tx, user_id).await?;
        let line = Self::create(&mut *tx, cart.id, product_id, size).await?;

        tx.commit().await?;

        info!(
            user_id,
            order_id = cart.id,
            product_id,
            order_detail_id = line.id,
            "Added product to cart"
        );

        Ok(Some(line))
    }

    /// Lists an order's lines with their products, oldest line first
    pub async fn list_with_products(
        pool: &PgPool,
        order_id: i32,
    ) -> Result<Vec<OrderDetailWithProduct>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT d.id AS detail_id, d.size AS detail_size, {}
            FROM order_details d
            JOIN products p ON p.id = d.product_id
            WHERE d.order_id = $1
            ORDER BY d.id
            "#,
            qualify("p", PRODUCT_COLUMNS)
        );

        sqlx::query_as::<_, OrderDetailWithProduct>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    /// Status of the order holding a line, if the line belongs to the user
    pub async fn order_status_for_user(
        pool: &PgPool,
        id: i32,
        user_id: i32,
    ) -> Result<Option<OrderStatus>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT o.status
            FROM order_details d
            JOIN orders o ON o.id = d.order_id
            WHERE d.id = $1 AND o.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Changes the size on a line in the user's cart
    pub async fn update_size(
        pool: &PgPool,
        id: i32,
        user_id: i32,
        size: &str,
    ) -> Result<CartOutcome<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE order_details d
            SET size = $2, updated_at = NOW()
            FROM orders o
            WHERE d.id = $1
              AND d.order_id = o.id
              AND o.user_id = $3
              AND o.status = 'onCart'
            RETURNING {}
            "#,
            qualify("d", DETAIL_COLUMNS)
        );

        let updated = sqlx::query_as::<_, OrderDetail>(&query)
            .bind(id)
            .bind(size)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        if let Some(line) = updated {
            info!(user_id, order_detail_id = id, size, "Updated cart line size");
            return Ok(CartOutcome::Applied(line));
        }

        let status = Self::order_status_for_user(pool, id, user_id).await?;
        Ok(CartOutcome::rejected(status))
    }

    /// Removes a line from the user's cart
    pub async fn delete_from_cart(
        pool: &PgPool,
        id: i32,
        user_id: i32,
    ) -> Result<CartOutcome<()>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM order_details d
            USING orders o
            WHERE d.id = $1
              AND d.order_id = o.id
              AND o.user_id = $2
              AND o.status = 'onCart'
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            info!(user_id, order_detail_id = id, "Removed cart line");
            return Ok(CartOutcome::Applied(()));
        }

        let status = Self::order_status_for_user(pool, id, user_id).await?;
        Ok(CartOutcome::rejected(status))
    }
}

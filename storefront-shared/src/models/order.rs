/// Orders and the cart lifecycle
///
/// An order starts life as the user's cart (`onCart`) and becomes
/// `Completed` once paid. A partial unique index guarantees at most one
/// `onCart` order per user, so the cart can be found or created without
/// locking.
///
/// Status-guarded writes are single conditional statements. When one touches
/// no rows, a follow-up lookup decides whether the target is missing or just
/// no longer on the cart; the answer is reported as a [`CartOutcome`].
///
/// # Schema
///
/// ```sql
/// CREATE TYPE order_status AS ENUM ('onCart', 'Completed');
///
/// CREATE TABLE orders (
///     id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     status order_status NOT NULL DEFAULT 'onCart',
///     total_paid INTEGER,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE UNIQUE INDEX uq_orders_one_cart_per_user ON orders(user_id) WHERE status = 'onCart';
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use super::order_detail::{OrderDetail, OrderDetailWithProduct};

const ORDER_COLUMNS: &str = "id, user_id, status, total_paid, created_at, updated_at";

/// Insert-then-read passes made by `find_or_create_cart`
const CART_ATTEMPTS: u32 = 2;

/// Order lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status")]
pub enum OrderStatus {
    /// Open cart; lines may be added, changed or removed
    #[default]
    #[serde(rename = "onCart")]
    #[sqlx(rename = "onCart")]
    OnCart,

    /// Paid; immutable
    Completed,
}

impl OrderStatus {
    /// Wire and database name
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::OnCart => "onCart",
            OrderStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a status that is not `onCart` or `Completed`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "onCart" => Ok(OrderStatus::OnCart),
            "Completed" => Ok(OrderStatus::Completed),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

/// Result of a write that is only allowed while an order is on the cart
#[derive(Debug, Clone, PartialEq)]
pub enum CartOutcome<T> {
    /// The write happened
    Applied(T),

    /// No such row for this user
    NotFound,

    /// The row exists but its order has left the cart
    NotOnCart,
}

impl<T> CartOutcome<T> {
    /// Builds the rejection for a write that touched no rows
    ///
    /// `status` is the current status of the target's order, if the target
    /// still exists for this user.
    pub(crate) fn rejected(status: Option<OrderStatus>) -> Self {
        match status {
            Some(OrderStatus::Completed) => CartOutcome::NotOnCart,
            Some(OrderStatus::OnCart) | None => CartOutcome::NotFound,
        }
    }
}

/// An order row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,

    #[serde(rename = "UserId")]
    pub user_id: i32,

    pub status: OrderStatus,

    /// Amount paid, when recorded
    pub total_paid: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order together with its lines and their products
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithDetails {
    #[serde(flatten)]
    pub order: Order,

    #[serde(rename = "OrderDetails")]
    pub order_details: Vec<OrderDetailWithProduct>,
}

impl Order {
    /// Returns the user's cart, creating it if needed
    ///
    /// Runs on one connection, so callers normally pass an open transaction.
    /// Concurrent callers for the same user converge on one cart through the
    /// partial unique index. If the existing cart is completed between the
    /// insert and the read, a fresh cart is created on the second pass.
    pub async fn find_or_create_cart(
        conn: &mut PgConnection,
        user_id: i32,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM orders WHERE user_id = $1 AND status = 'onCart'",
            ORDER_COLUMNS
        );

        for attempt in 1..=CART_ATTEMPTS {
            let inserted = sqlx::query(
                r#"
                INSERT INTO orders (user_id, status)
                VALUES ($1, 'onCart')
                ON CONFLICT (user_id) WHERE status = 'onCart' DO NOTHING
                "#,
            )
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

            if inserted.rows_affected() > 0 {
                info!(user_id, "Created cart");
            }

            let cart = sqlx::query_as::<_, Order>(&query)
                .bind(user_id)
                .fetch_optional(&mut *conn)
                .await?;

            match cart {
                Some(cart) => return Ok(cart),
                None => warn!(user_id, attempt, "Cart completed while adding to it"),
            }
        }

        Err(sqlx::Error::Protocol(format!(
            "no cart for user {} after {} attempts",
            user_id, CART_ATTEMPTS
        )))
    }

    /// Finds the user's order in a given status
    ///
    /// A user has at most one cart but may have many completed orders; the
    /// most recent one is returned.
    pub async fn find_by_user_and_status(
        pool: &PgPool,
        user_id: i32,
        status: OrderStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {} FROM orders
            WHERE user_id = $1 AND status = $2
            ORDER BY id DESC
            LIMIT 1
            "#,
            ORDER_COLUMNS
        );

        sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Like [`Order::find_by_user_and_status`], with lines and products attached
    pub async fn find_with_details(
        pool: &PgPool,
        user_id: i32,
        status: OrderStatus,
    ) -> Result<Option<OrderWithDetails>, sqlx::Error> {
        let Some(order) = Self::find_by_user_and_status(pool, user_id, status).await? else {
            return Ok(None);
        };

        let order_details = OrderDetail::list_with_products(pool, order.id).await?;

        Ok(Some(OrderWithDetails {
            order,
            order_details,
        }))
    }

    /// Finds an order owned by a user
    pub async fn find_for_user(
        pool: &PgPool,
        id: i32,
        user_id: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM orders WHERE id = $1 AND user_id = $2",
            ORDER_COLUMNS
        );

        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Marks the user's cart order as paid
    ///
    /// Only an `onCart` order can be completed. Orders belonging to other
    /// users are reported as not found.
    pub async fn complete(
        pool: &PgPool,
        id: i32,
        user_id: i32,
    ) -> Result<CartOutcome<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE orders
            SET status = 'Completed', updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'onCart'
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );

        let updated = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        if let Some(order) = updated {
            info!(order_id = order.id, user_id, "Order completed");
            return Ok(CartOutcome::Applied(order));
        }

        let current = Self::find_for_user(pool, id, user_id).await?;
        Ok(CartOutcome::rejected(current.map(|o| o.status)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_parse() {
        assert_eq!("onCart".parse::<OrderStatus>(), Ok(OrderStatus::OnCart));
        assert_eq!("Completed".parse::<OrderStatus>(), Ok(OrderStatus::Completed));

        let err = "paid".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown order status: paid");

        // Status names are case sensitive on the wire
        assert!("oncart".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_status_display_matches_parse() {
        for status in [OrderStatus::OnCart, OrderStatus::Completed] {
            assert_eq!(status.to_string().parse::<OrderStatus>(), Ok(status));
        }
        assert_eq!(OrderStatus::default(), OrderStatus::OnCart);
    }

    #[test]
    fn test_order_status_serde() {
        assert_eq!(
            serde_json::to_value(OrderStatus::OnCart).unwrap(),
            serde_json::json!("onCart")
        );
        assert_eq!(
            serde_json::from_value::<OrderStatus>(serde_json::json!("Completed")).unwrap(),
            OrderStatus::Completed
        );
    }

    #[test]
    fn test_cart_outcome_rejected() {
        assert_eq!(CartOutcome::<()>::rejected(None), CartOutcome::NotFound);
        assert_eq!(
            CartOutcome::<()>::rejected(Some(OrderStatus::Completed)),
            CartOutcome::NotOnCart
        );
    }

    #[test]
    fn test_order_with_details_wire_shape() {
        let order = OrderWithDetails {
            order: Order {
                id: 4,
                user_id: 2,
                status: OrderStatus::OnCart,
                total_paid: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            order_details: vec![],
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["UserId"], 2);
        assert_eq!(json["status"], "onCart");
        assert!(json["totalPaid"].is_null());
        assert_eq!(json["OrderDetails"], serde_json::json!([]));
    }
}

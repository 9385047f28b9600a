/// Product catalog model
///
/// Products are read-only through the API. `create` exists for
/// seeding and tests.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     price INTEGER NOT NULL CHECK (price >= 0),
///     weight INTEGER NOT NULL CHECK (weight >= 0),
///     img_url VARCHAR(1024) NOT NULL,
///     category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
///     sizes TEXT[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

/// Column list shared by every product query
///
/// Also used by order detail queries that flatten a product into their rows.
pub(crate) const PRODUCT_COLUMNS: &str =
    "id, name, description, price, weight, img_url, category_id, sizes, created_at, updated_at";

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,

    /// Price in the smallest currency unit
    pub price: i32,

    /// Shipping weight in grams
    pub weight: i32,

    pub img_url: String,

    #[serde(rename = "CategoryId")]
    pub category_id: i32,

    /// Sizes a buyer may pick, e.g. `["S", "M", "L"]`
    pub sizes: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: i32,
    pub weight: i32,
    pub img_url: String,
    pub category_id: i32,
    pub sizes: Vec<String>,
}

/// Filters for listing products
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name
    pub search: Option<String>,

    pub category_id: Option<i32>,
}

/// Escapes LIKE metacharacters and wraps the term in `%` wildcards
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

impl Product {
    /// Inserts a product
    pub async fn create(pool: &PgPool, data: CreateProduct) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO products (name, description, price, weight, img_url, category_id, sizes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );

        sqlx::query_as::<_, Product>(&query)
            .bind(data.name)
            .bind(data.description)
            .bind(data.price)
            .bind(data.weight)
            .bind(data.img_url)
            .bind(data.category_id)
            .bind(data.sizes)
            .fetch_one(pool)
            .await
    }

    /// Finds a product by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);

        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Checks whether a product exists
    ///
    /// Takes any executor so it can run inside the add-to-cart transaction.
    pub async fn exists<'e, E>(executor: E, id: i32) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Counts products matching a filter
    pub async fn count(pool: &PgPool, filter: &ProductFilter) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM products
            WHERE ($1::TEXT IS NULL OR name ILIKE $1)
              AND ($2::INTEGER IS NULL OR category_id = $2)
            "#,
        )
        .bind(filter.search.as_deref().map(like_pattern))
        .bind(filter.category_id)
        .fetch_one(pool)
        .await
    }

    /// Lists one page of products matching a filter, ordered by ID
    pub async fn list(
        pool: &PgPool,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {} FROM products
            WHERE ($1::TEXT IS NULL OR name ILIKE $1)
              AND ($2::INTEGER IS NULL OR category_id = $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
            PRODUCT_COLUMNS
        );

        sqlx::query_as::<_, Product>(&query)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.category_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}

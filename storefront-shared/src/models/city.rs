/// City reference data
///
/// Cities are seeded out of band and referenced by `users.city_id`. The API
/// only lists them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A city or regency
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: i32,
    pub province: String,

    /// "Kabupaten" or "Kota"
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,

    pub city_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for seeding a city
#[derive(Debug, Clone)]
pub struct CreateCity {
    pub province: String,
    pub kind: String,
    pub city_name: String,
}

impl City {
    /// Inserts a city
    pub async fn create(pool: &PgPool, data: CreateCity) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, City>(
            r#"
            INSERT INTO cities (province, type, city_name)
            VALUES ($1, $2, $3)
            RETURNING id, province, type, city_name, created_at, updated_at
            "#,
        )
        .bind(data.province)
        .bind(data.kind)
        .bind(data.city_name)
        .fetch_one(pool)
        .await
    }

    /// Lists every city ordered by ID
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, City>(
            r#"
            SELECT id, province, type, city_name, created_at, updated_at
            FROM cities
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Checks whether a city exists
    pub async fn exists(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM cities WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Deletes a city
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// User model and database operations
///
/// Users are created at registration and their profile fields are filled in
/// later through the user details endpoint. The password hash never leaves
/// the server: it is skipped during serialization.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     full_name VARCHAR(255),
///     phone_number VARCHAR(50),
///     address TEXT,
///     city VARCHAR(255),
///     province VARCHAR(255),
///     postal_code VARCHAR(20),
///     city_id INTEGER REFERENCES cities(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use storefront_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         email: "budi@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
///
/// let found = User::find_by_email(&pool, "budi@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

const USER_COLUMNS: &str = "id, email, password_hash, full_name, phone_number, address, \
                            city, province, postal_code, city_id, created_at, updated_at";

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,

    /// Unique login email
    pub email: String,

    /// Argon2id PHC string
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,

    /// Reference to `cities.id`
    #[serde(rename = "CityId")]
    pub city_id: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,

    /// Already hashed; never plaintext
    pub password_hash: String,
}

/// Profile fields editable through `PUT /userDetails`
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserDetails {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub city_id: Option<i32>,
}

impl UpdateUserDetails {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns a unique-violation database error if the email is taken.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.email)
            .bind(data.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by exact email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Checks whether a user with this ID exists
    ///
    /// Used on every authenticated request, so it avoids loading the row.
    pub async fn exists(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Checks whether an email is already registered
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Updates profile fields
    ///
    /// Each `None` keeps the current column value. `updated_at` is always
    /// bumped.
    ///
    /// # Returns
    ///
    /// The updated user, or `None` if no user has this ID
    ///
    /// # Errors
    ///
    /// Returns a foreign-key violation if `city_id` does not reference a city.
    pub async fn update_details(
        pool: &PgPool,
        id: i32,
        data: UpdateUserDetails,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE users SET
                full_name = COALESCE($2, full_name),
                phone_number = COALESCE($3, phone_number),
                address = COALESCE($4, address),
                city = COALESCE($5, city),
                province = COALESCE($6, province),
                postal_code = COALESCE($7, postal_code),
                city_id = COALESCE($8, city_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(data.full_name)
            .bind(data.phone_number)
            .bind(data.address)
            .bind(data.city)
            .bind(data.province)
            .bind(data.postal_code)
            .bind(data.city_id)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a user and, through cascades, their orders
    ///
    /// Not exposed over HTTP; used by tooling and test cleanup.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

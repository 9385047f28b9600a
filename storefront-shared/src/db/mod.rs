/// Database layer
///
/// - `pool`: PostgreSQL connection pool creation and health checks
/// - `migrations`: Embedded schema migrations (see `migrations/` in this crate)
///
/// Models live in the crate-level `models` module.
///
/// # Example
///
/// ```no_run
/// use storefront_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

pub mod migrations;
pub mod pool;

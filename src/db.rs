//! Database connection pool and migration management.

use sqlx::{Pool, Postgres};

/// Type alias for the PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// Connections are created lazily and reused across requests.
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the server is
/// unreachable.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        // Limit concurrent connections
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are tracked in the `_sqlx_migrations` table, so each one runs
/// only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro embeds the migrations at compile time
    sqlx::migrate!("./migrations").run(pool).await
}

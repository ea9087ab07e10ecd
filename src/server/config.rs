/**
 * Server Configuration
 *
 * Environment-driven configuration, loaded once at startup. Defaults suit
 * local development; the JWT secret default in `auth::tokens` is likewise
 * a development-only fallback.
 */

use sqlx::SqlitePool;

/// Runtime configuration read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port (`PORT`, default 3000).
    pub port: u16,
    /// SQLite database URL (`DATABASE_URL`, default `sqlite:chatterbox.db?mode=rwc`).
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:chatterbox.db?mode=rwc".to_string());

        Self { port, database_url }
    }
}

/// Open the database pool and bring the schema up to date.
///
/// Unlike a missing optional service, a database that cannot be reached is
/// fatal: every data path maps store failures to 500, so there is no
/// degraded mode to run in.
pub async fn init_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");
    let pool = SqlitePool::connect(database_url).await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}

/// In-memory database for tests. A single connection, because each
/// `sqlite::memory:` connection would otherwise get its own database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("migrations apply cleanly");
    pool
}

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::AppError;

pub type DbPool = SqlitePool;

/// Opens the store at `database_url`, creating the file when missing, and
/// applies pending migrations.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DbPool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    migrate(&pool).await?;
    info!(database_url, max_connections, "database ready");
    Ok(pool)
}

/// Single-connection in-memory store. Every pooled connection to
/// `sqlite::memory:` would see its own empty database, so the pool is pinned
/// to one connection that is never recycled.
pub async fn connect_in_memory() -> Result<DbPool, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    migrate(&pool).await?;
    debug!("in-memory database ready");
    Ok(pool)
}

pub async fn migrate(pool: &DbPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn close(pool: DbPool) {
    pool.close().await;
    info!("database closed");
}

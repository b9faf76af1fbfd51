// ABOUTME: SQLite connection pool setup and migration runner
// ABOUTME: File databases use WAL; in-memory databases pin a single connection

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::StorageResult;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connect to a SQLite database URL, creating the file if needed, and run migrations
pub async fn connect(database_url: &str, max_connections: u32) -> StorageResult<SqlitePool> {
    if database_url.contains(":memory:") {
        return connect_in_memory().await;
    }

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true);

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    debug!("Connecting to database: {}", database_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await?;

    info!("Database connection established");

    MIGRATOR.run(&pool).await?;
    info!("Database migrations applied");

    Ok(pool)
}

/// In-memory database with migrations applied. Every connection to
/// `sqlite::memory:` is a separate database, so the pool holds exactly one
/// connection that never expires.
pub async fn connect_in_memory() -> StorageResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

/// Database layer for the account service
///
/// Manages the connection pool, embedded migrations, and provides typed access
/// to the account table.

pub mod account;

pub use account::AccountStore;

use crate::error::{AccountError, AccountResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

/// Database connection options
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub enable_wal: bool,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
            enable_wal: true,
        }
    }
}

/// Create a SQLite connection pool
///
/// The acquire timeout bounds how long a request waits on an exhausted pool;
/// past it the caller gets `PoolTimedOut` instead of hanging.
pub async fn create_pool(path: &Path, options: DatabaseOptions) -> AccountResult<SqlitePool> {
    if path == Path::new(":memory:") {
        return create_memory_pool().await;
    }

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let connect_options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(if options.enable_wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        })
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections)
        .acquire_timeout(options.acquire_timeout)
        .connect_with(connect_options)
        .await?;

    Ok(pool)
}

/// Create a single-connection in-memory pool
///
/// Each SQLite in-memory connection is its own database, so the pool is
/// capped at one connection that never gets recycled.
pub async fn create_memory_pool() -> AccountResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    Ok(pool)
}

/// Run migrations for a database
/// Migrations are embedded at compile time from ./migrations directory
pub async fn run_migrations(pool: &SqlitePool) -> AccountResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}

/// Test database connection
pub async fn test_connection(pool: &SqlitePool) -> AccountResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(AccountError::Database)?;

    Ok(())
}

//! Database module
//!
//! SQLite-backed key-value store:
//! - Schema and migrations
//! - Connection pool setup, on disk or in memory
//! - [`SqliteStore`], the `kv` table behind [`crate::storage::KeyValueStore`]

pub mod schema;
pub mod store;

pub use schema::initialize_database;
pub use store::SqliteStore;

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Options for the database file at `db_path`, created on first use.
fn file_options(db_path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .busy_timeout(BUSY_TIMEOUT)
        .journal_mode(SqliteJournalMode::Wal)
}

/// Open a one-connection pool and bring its schema up to date.
///
/// The store is the only writer, so one connection is enough, and it
/// keeps an in-memory database alive for as long as the pool is.
async fn open_pool(options: SqliteConnectOptions) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    initialize_database(&pool).await?;

    Ok(pool)
}

/// Create (or reopen) the database at `db_path` and apply migrations.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::info!("Creating database connection pool at: {:?}", db_path);

    // The data directory may not exist on first launch
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let pool = open_pool(file_options(db_path)).await?;

    tracing::info!("Database pool created successfully");

    Ok(pool)
}

/// Create a migrated database that lives only as long as the pool.
pub async fn create_memory_pool() -> Result<SqlitePool> {
    tracing::debug!("Creating in-memory database");

    // Every `:memory:` connection is its own database; the pool holds one
    open_pool(SqliteConnectOptions::new().in_memory(true)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn kv_table_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv'")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_pool_creates_file_and_schema() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("noto.db");

        let pool = create_pool(&db_path).await.unwrap();

        assert!(db_path.exists());
        assert_eq!(kv_table_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_reopening_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("noto.db");

        let pool = create_pool(&db_path).await.unwrap();
        sqlx::query("INSERT INTO kv (key, value, updated_at) VALUES ('k', 'v', 'now')")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        let pool = create_pool(&db_path).await.unwrap();
        let value: String = sqlx::query_scalar("SELECT value FROM kv WHERE key = 'k'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(value, "v");
    }

    #[tokio::test]
    async fn test_memory_pool_is_migrated() {
        let pool = create_memory_pool().await.unwrap();
        assert_eq!(kv_table_count(&pool).await, 1);
    }
}

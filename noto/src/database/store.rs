//! SQLite key-value store
//!
//! One row per key in the `kv` table, written with an upsert.

use crate::error::Result;
use crate::storage::KeyValueStore;
use chrono::Utc;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        // One row per key; a second write replaces the value in place
        sqlx::query(
            r#"
            INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!("Set key {} ({} bytes)", key, value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Removed key {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;

    async fn create_test_store() -> SqliteStore {
        SqliteStore::new(create_memory_pool().await.unwrap())
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = create_test_store().await;

        assert_eq!(store.get("noto-notes").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert() {
        let store = create_test_store().await;

        store.set("noto-notes", "[]").await.unwrap();
        store.set("noto-notes", r#"[{"id":"1"}]"#).await.unwrap();

        let value = store.get("noto-notes").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"[{"id":"1"}]"#));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = create_test_store().await;

        store.set("noto-notes", "[]").await.unwrap();
        store.remove("noto-notes").await.unwrap();

        assert_eq!(store.get("noto-notes").await.unwrap(), None);
    }
}

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use super::DbPool;
use crate::storage::KeyValueStore;
use crate::utils::error::{StorageError, StorageResult};

pub struct SqliteStore {
    pool: DbPool,
    capacity: usize,
}

impl SqliteStore {
    pub fn new(pool: DbPool, capacity: usize) -> Self {
        Self { pool, capacity }
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = sqlx::query("SELECT value FROM kv_entries WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(|row| row.get::<String, _>("value"));

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;

        let others = sqlx::query(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0) as used
             FROM kv_entries WHERE key != ?",
        )
        .bind(key)
        .fetch_one(&mut *tx)
        .await?
        .get::<i64, _>("used");

        let requested = others as usize + key.len() + value.len();
        if requested > self.capacity {
            tx.rollback().await?;
            return Err(StorageError::QuotaExceeded {
                requested,
                capacity: self.capacity,
            });
        }

        sqlx::query(
            "INSERT INTO kv_entries (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM kv_entries WHERE key = ?")
            .bind(key)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_pool;
    use tempfile::TempDir;

    async fn open_store(dir: &TempDir, capacity: usize) -> SqliteStore {
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("kv.db").display());
        let pool = create_pool(&url).await.unwrap();
        SqliteStore::new(pool, capacity)
    }

    #[tokio::test]
    async fn test_upsert_and_remove() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, 1024).await;

        store.set("users", "[]").await.unwrap();
        store.set("users", "[1]").await.unwrap();
        assert_eq!(store.get("users").await.unwrap().as_deref(), Some("[1]"));

        store.remove("users").await.unwrap();
        assert_eq!(store.get("users").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_quota_rejects_without_partial_write() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, 16).await;

        store.set("k", "ok").await.unwrap();
        let err = store.set("k", "this value is way over").await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir, 1024).await;
            store.set("current", "{\"id\":1}").await.unwrap();
        }
        let store = open_store(&dir, 1024).await;
        assert_eq!(
            store.get("current").await.unwrap().as_deref(),
            Some("{\"id\":1}")
        );
    }
}

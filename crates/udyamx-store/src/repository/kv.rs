//! # Local Key/Value Store
//!
//! Named JSON records in the `app_storage` table.
//!
//! ## Read / Write Contract
//! ```text
//! write(key, value) ──► serde_json::to_string ──► UPSERT app_storage
//!
//! read(key, default)
//!   ├── no row ─────────────────────────► default
//!   ├── row, JSON parses as T ──────────► value
//!   └── row, JSON does not parse ───────► default  (warn! logged)
//! ```
//! Only storage I/O failures are errors; a corrupt record never is.
//!
//! ## Read-Modify-Write
//! A record is always rewritten whole, so two edits that each read the old
//! value would lose one of them. [`LocalStore::update`] holds the store's
//! write lock across the read and the write. Every handle made by one
//! [`Database`](crate::Database) shares that lock.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

/// Handle to the key/value table. Cheap to clone.
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
    writes: Arc<Mutex<()>>,
}

impl LocalStore {
    pub fn new(pool: SqlitePool, writes: Arc<Mutex<()>>) -> Self {
        LocalStore { pool, writes }
    }

    /// Reads and parses a record, falling back to `default`.
    pub async fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> DbResult<T> {
        let Some(text) = self.read_raw(key).await? else {
            return Ok(default);
        };

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Stored record is unreadable, using default");
                Ok(default)
            }
        }
    }

    /// Serializes and stores a record, replacing any previous value.
    pub async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> DbResult<()> {
        let text = serde_json::to_string(value).map_err(|e| DbError::encode(key, e))?;
        self.write_raw(key, &text).await
    }

    /// Reads a record, lets `f` edit it, and writes it back while holding
    /// the write lock.
    ///
    /// When `f` fails nothing is written.
    pub async fn update<T, R, F>(&self, key: &str, default: T, f: F) -> DbResult<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> DbResult<R>,
    {
        let _guard = self.writes.lock().await;
        let mut value = self.read(key, default).await?;
        let result = f(&mut value)?;
        self.write(key, &value).await?;
        Ok(result)
    }

    /// Writes `value` only when no record exists yet. Returns whether it wrote.
    pub async fn write_if_absent<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> DbResult<bool> {
        let _guard = self.writes.lock().await;
        if self.contains(key).await? {
            return Ok(false);
        }
        self.write(key, value).await?;
        Ok(true)
    }

    /// The stored text, if any.
    pub async fn read_raw(&self, key: &str) -> DbResult<Option<String>> {
        let text: Option<String> = sqlx::query_scalar("SELECT value FROM app_storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(text)
    }

    /// Stores text verbatim.
    pub async fn write_raw(&self, key: &str, text: &str) -> DbResult<()> {
        debug!(key = %key, bytes = text.len(), "Writing record");

        sqlx::query(
            r#"
            INSERT INTO app_storage (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(text)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Whether a record exists (parseable or not).
    pub async fn contains(&self, key: &str) -> DbResult<bool> {
        Ok(self.read_raw(key).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_missing_key_returns_default() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let value: Vec<u32> = db.storage().read("nothing-here", vec![7]).await.unwrap();
        assert_eq!(value, vec![7]);
    }

    #[tokio::test]
    async fn test_write_then_read_replaces_value() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.storage();

        let mut first = BTreeMap::new();
        first.insert("a".to_string(), 1);
        store.write("map", &first).await.unwrap();

        first.insert("b".to_string(), 2);
        store.write("map", &first).await.unwrap();

        let read: BTreeMap<String, i32> = store.read("map", BTreeMap::new()).await.unwrap();
        assert_eq!(read.len(), 2);
        assert!(store.contains("map").await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_record_falls_back_to_default() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.storage();

        store.write_raw("udyamx-invoices", "{not json").await.unwrap();
        let value: Vec<String> = store.read("udyamx-invoices", Vec::new()).await.unwrap();
        assert!(value.is_empty());

        // Wrong shape is just as unreadable
        store.write_raw("udyamx-invoices", "{\"a\":1}").await.unwrap();
        let value: Vec<String> = store.read("udyamx-invoices", vec!["d".to_string()]).await.unwrap();
        assert_eq!(value, vec!["d".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_update_writes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.storage();
        store.write("counter", &1u32).await.unwrap();

        let failed: Result<(), _> = store
            .update("counter", 0u32, |n| {
                *n += 1;
                Err(DbError::Other("rejected".to_string()))
            })
            .await;
        assert!(failed.is_err());
        assert_eq!(store.read("counter", 0u32).await.unwrap(), 1);

        assert!(!store.write_if_absent("counter", &9u32).await.unwrap());
        assert!(store.write_if_absent("fresh", &9u32).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("udyamx.db"))).await.unwrap();

        let mut tasks = Vec::new();
        for _ in 0..40 {
            let store = db.storage();
            tasks.push(tokio::spawn(async move {
                store
                    .update("counter", 0u32, |n| {
                        *n += 1;
                        Ok(())
                    })
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(db.storage().read("counter", 0u32).await.unwrap(), 40);
    }
}

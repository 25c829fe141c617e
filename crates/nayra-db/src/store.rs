//! # Key/Value Store
//!
//! The durable string store every cache snapshot is written to.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KeyValueStore (trait)                              │
//! │                                                                         │
//! │   get(key) -> Option<String>     put(key, value)                       │
//! │   remove(key)                    keys() -> Vec<String>                 │
//! │                                                                         │
//! │        ┌──────────────────────┐        ┌──────────────────────┐         │
//! │        │      Database        │        │     MemoryStore      │         │
//! │        │  kv_store table      │        │  BTreeMap in a lock  │         │
//! │        │  (durable, SQLite)   │        │  (tests, optional    │         │
//! │        │                      │        │   byte quota)        │         │
//! │        └──────────────────────┘        └──────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::pool::Database;

/// A durable map from string keys to string values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> DbResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> DbResult<()>;

    /// Lists every stored key in ascending order.
    async fn keys(&self) -> DbResult<Vec<String>>;
}

// =============================================================================
// SQLite
// =============================================================================

#[async_trait]
impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(self.pool())
            .await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key, bytes = value.len(), "Writing key");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(self.pool())
            .await?;
        Ok(keys)
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// Process-local store. Clones share the same map.
///
/// With [`MemoryStore::with_quota`] it behaves like browser storage with a
/// size limit: a write that would push the total size of keys and values
/// past the quota fails with [`DbError::QuotaExceeded`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that refuses to hold more than `bytes` bytes.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Arc::default(),
            quota: Some(bytes),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        let mut entries = self.entries.write().await;

        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            if used + needed > quota {
                return Err(DbError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available: quota.saturating_sub(used),
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> DbResult<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

//! # Sync Adapter
//!
//! Typed per-collection calls on top of a [`RemoteStore`]. Rows are mapped
//! through [`SyncRecord`] so managers only ever see domain models.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::{RemoteError, RemoteResult};
use crate::remote::{RemoteStore, RemovableRecord, SyncRecord};

#[derive(Clone)]
pub struct SyncAdapter {
    remote: Arc<dyn RemoteStore>,
}

impl fmt::Debug for SyncAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncAdapter").finish_non_exhaustive()
    }
}

fn encode<T: SyncRecord>(record: &T) -> RemoteResult<Value> {
    serde_json::to_value(record.to_row())
        .map_err(|e| RemoteError::InvalidResponse(format!("{} row encode: {}", T::TABLE, e)))
}

fn decode<T: SyncRecord>(row: Value) -> RemoteResult<T> {
    serde_json::from_value::<T::Row>(row)
        .map(T::from_row)
        .map_err(|e| RemoteError::InvalidResponse(format!("{} row decode: {}", T::TABLE, e)))
}

impl SyncAdapter {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self { remote }
    }

    /// Every remote record, in the table's canonical order.
    pub async fn fetch_all<T: SyncRecord>(&self) -> RemoteResult<Vec<T>> {
        let rows = self.remote.select(T::TABLE, T::ORDER).await?;
        debug!(table = T::TABLE, count = rows.len(), "Fetched remote rows");
        rows.into_iter().map(decode::<T>).collect()
    }

    /// Inserts one record and returns the server's copy of it.
    pub async fn insert_one<T: SyncRecord>(&self, record: &T) -> RemoteResult<T> {
        let stored = self.remote.insert(T::TABLE, encode(record)?).await?;
        decode(stored)
    }

    /// Upserts records one request at a time, stopping at the first failure.
    ///
    /// Records before the failing one stay written; nothing is rolled back.
    pub async fn upsert_many<T: SyncRecord>(&self, records: &[T]) -> RemoteResult<()> {
        for (index, record) in records.iter().enumerate() {
            if let Err(e) = self.remote.upsert(T::TABLE, encode(record)?).await {
                debug!(table = T::TABLE, index, total = records.len(), "Upsert stopped");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Deletes the remote record(s) identified by `key`.
    pub async fn delete_one<T: RemovableRecord>(&self, key: &str) -> RemoteResult<()> {
        self.remote.delete(T::TABLE, T::KEY_COLUMN, key).await
    }

    pub async fn ping(&self) -> RemoteResult<()> {
        self.remote.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryRemote;
    use nayra_core::{Money, Product};
    use serde_json::json;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            stock: 40,
            price: Money::from_rupees(30),
            unit: "cup".into(),
            category: "curd".into(),
        }
    }

    #[tokio::test]
    async fn test_upsert_many_stops_at_first_failure() {
        let remote = MemoryRemote::new();
        remote.reject_rows("id", json!("p2")).await;
        let adapter = SyncAdapter::new(Arc::new(remote.clone()));

        let products = vec![product("p1", "A"), product("p2", "B"), product("p3", "C")];
        assert!(adapter.upsert_many(&products).await.is_err());

        let ids: Vec<Value> = remote.rows("products").await.into_iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!("p1")]);
    }

    #[tokio::test]
    async fn test_fetch_all_decodes_and_orders() {
        let remote = MemoryRemote::new();
        let adapter = SyncAdapter::new(Arc::new(remote.clone()));
        adapter.insert_one(&product("p2", "Paneer")).await.unwrap();
        adapter.insert_one(&product("p1", "Butter")).await.unwrap();

        let fetched: Vec<Product> = adapter.fetch_all().await.unwrap();
        assert_eq!(fetched, vec![product("p1", "Butter"), product("p2", "Paneer")]);
    }

    #[tokio::test]
    async fn test_bad_remote_row_is_invalid_response() {
        let remote = MemoryRemote::new();
        remote.seed("products", vec![json!({"id": "p1"})]).await;
        let adapter = SyncAdapter::new(Arc::new(remote));

        let result: RemoteResult<Vec<Product>> = adapter.fetch_all().await;
        assert!(matches!(result, Err(RemoteError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_delete_one_uses_key_column() {
        let remote = MemoryRemote::new();
        let adapter = SyncAdapter::new(Arc::new(remote.clone()));
        adapter.insert_one(&product("p1", "Butter")).await.unwrap();

        adapter.delete_one::<Product>("p1").await.unwrap();
        assert!(remote.rows("products").await.is_empty());
    }
}

//! # In-Memory Remote
//!
//! A [`RemoteStore`] holding its tables in process. Backs `--remote memory`
//! and the sync tests, which flip it offline or make it reject rows to
//! exercise the failure paths.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use nayra_core::generate_id;

use super::{RemoteStore, SortBy};
use crate::error::{RemoteError, RemoteResult};

#[derive(Debug, Default)]
struct Inner {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    rejected: Mutex<Vec<(String, Value)>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

/// Process-local remote store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<Inner>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails with [`RemoteError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, AtomicOrdering::SeqCst);
    }

    /// Makes inserts and upserts of rows with `column == value` fail.
    pub async fn reject_rows(&self, column: &str, value: Value) {
        self.inner
            .rejected
            .lock()
            .await
            .push((column.to_string(), value));
    }

    pub async fn accept_all_rows(&self) {
        self.inner.rejected.lock().await.clear();
    }

    /// Number of calls made so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(AtomicOrdering::SeqCst)
    }

    /// Current rows of `table`, in insertion order.
    pub async fn rows(&self, table: &str) -> Vec<Value> {
        self.inner
            .tables
            .lock()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces the rows of `table` without counting as a call.
    pub async fn seed(&self, table: &str, rows: Vec<Value>) {
        self.inner.tables.lock().await.insert(table.to_string(), rows);
    }

    async fn enter(&self, op: &str, table: &str) -> RemoteResult<()> {
        self.inner.calls.fetch_add(1, AtomicOrdering::SeqCst);
        debug!(op, table, "Memory remote call");
        if self.inner.failing.load(AtomicOrdering::SeqCst) {
            return Err(RemoteError::Unavailable("memory remote is offline".into()));
        }
        Ok(())
    }

    async fn check_row(&self, table: &str, row: &Value) -> RemoteResult<()> {
        let rejected = self.inner.rejected.lock().await;
        for (column, value) in rejected.iter() {
            if row.get(column) == Some(value) {
                return Err(RemoteError::ServerError(format!(
                    "{} row rejected on {} = {}",
                    table, column, value
                )));
            }
        }
        Ok(())
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn select(&self, table: &str, order: SortBy) -> RemoteResult<Vec<Value>> {
        self.enter("select", table).await?;
        let mut rows = self.rows(table).await;
        rows.sort_by(|a, b| {
            let ord = compare(
                a.get(order.column).unwrap_or(&Value::Null),
                b.get(order.column).unwrap_or(&Value::Null),
            );
            if order.ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Value) -> RemoteResult<Value> {
        self.enter("insert", table).await?;
        self.check_row(table, &row).await?;

        let Some(fields) = row.as_object_mut() else {
            return Err(RemoteError::InvalidResponse(format!(
                "{} insert expects an object",
                table
            )));
        };
        if table != "daily_summaries" && fields.get("id").map_or(true, Value::is_null) {
            fields.insert("id".into(), Value::String(generate_id()));
        }

        self.inner
            .tables
            .lock()
            .await
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn upsert(&self, table: &str, row: Value) -> RemoteResult<()> {
        self.enter("upsert", table).await?;
        self.check_row(table, &row).await?;

        let mut tables = self.inner.tables.lock().await;
        let rows = tables.entry(table.to_string()).or_default();
        let id = row.get("id").cloned();
        match rows
            .iter_mut()
            .find(|existing| id.is_some() && existing.get("id") == id.as_ref())
        {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
        Ok(())
    }

    async fn delete(&self, table: &str, column: &str, value: &str) -> RemoteResult<()> {
        self.enter("delete", table).await?;
        let mut tables = self.inner.tables.lock().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| row.get(column).and_then(Value::as_str) != Some(value));
        }
        Ok(())
    }

    async fn ping(&self) -> RemoteResult<()> {
        self.enter("ping", "").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_id_and_select_orders() {
        let remote = MemoryRemote::new();
        remote.insert("products", json!({"name": "Paneer"})).await.unwrap();
        let curd = remote.insert("products", json!({"name": "Curd"})).await.unwrap();
        assert!(curd["id"].is_string());

        let rows = remote.select("products", SortBy::asc("name")).await.unwrap();
        let names: Vec<&str> = rows.iter().filter_map(|r| r["name"].as_str()).collect();
        assert_eq!(names, vec!["Curd", "Paneer"]);

        let rows = remote.select("products", SortBy::desc("name")).await.unwrap();
        assert_eq!(rows[0]["name"], json!("Paneer"));
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let remote = MemoryRemote::new();
        remote.upsert("products", json!({"id": "p1", "stock": 1})).await.unwrap();
        remote.upsert("products", json!({"id": "p1", "stock": 7})).await.unwrap();
        let rows = remote.rows("products").await;
        assert_eq!(rows, vec![json!({"id": "p1", "stock": 7})]);
    }

    #[tokio::test]
    async fn test_delete_by_column() {
        let remote = MemoryRemote::new();
        remote
            .seed(
                "daily_summaries",
                vec![json!({"date": "2024-01-01"}), json!({"date": "2024-01-02"})],
            )
            .await;
        remote.delete("daily_summaries", "date", "2024-01-01").await.unwrap();
        assert_eq!(remote.rows("daily_summaries").await, vec![json!({"date": "2024-01-02"})]);
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let remote = MemoryRemote::new();
        remote.set_failing(true);
        assert!(matches!(remote.ping().await, Err(RemoteError::Unavailable(_))));
        remote.set_failing(false);
        assert!(remote.ping().await.is_ok());

        remote.reject_rows("id", json!("bad")).await;
        assert!(remote.insert("sales", json!({"id": "bad"})).await.is_err());
        assert!(remote.insert("sales", json!({"id": "good"})).await.is_ok());
        assert_eq!(remote.calls(), 4);
        assert_eq!(remote.rows("sales").await.len(), 1);
    }
}

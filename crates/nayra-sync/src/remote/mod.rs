//! # Remote Store
//!
//! Transport to the hosted relational store.
//!
//! ## Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   SyncAdapter (typed: Product / Sale / DailySummary)                   │
//! │        │   rows.rs: camelCase model ◄──► snake_case row                 │
//! │        ▼                                                                │
//! │   dyn RemoteStore (untyped JSON rows)                                  │
//! │        │                                                                │
//! │        ├── RestClient    PostgREST over reqwest                        │
//! │        └── MemoryRemote  in-process tables (tests, --remote memory)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod memory;
pub mod rest;
pub mod rows;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RemoteResult;

pub use memory::MemoryRemote;
pub use rest::RestClient;
pub use rows::{ProductLineRow, ProductRow, RemovableRecord, SaleRow, SummaryRow, SyncRecord};

/// Server-side ordering for a full-table select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortBy {
    pub column: &'static str,
    pub ascending: bool,
}

impl SortBy {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            ascending: true,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            ascending: false,
        }
    }
}

/// Row-level operations against the hosted store.
///
/// Every call is a single request; nothing is retried here.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Every row of `table`, ordered by `order`.
    async fn select(&self, table: &str, order: SortBy) -> RemoteResult<Vec<Value>>;

    /// Inserts one row and returns the row as stored by the server.
    async fn insert(&self, table: &str, row: Value) -> RemoteResult<Value>;

    /// Inserts or replaces one row matched on its primary key.
    async fn upsert(&self, table: &str, row: Value) -> RemoteResult<()>;

    /// Deletes every row whose `column` equals `value`.
    async fn delete(&self, table: &str, column: &str, value: &str) -> RemoteResult<()>;

    /// Cheap reachability check.
    async fn ping(&self) -> RemoteResult<()>;
}

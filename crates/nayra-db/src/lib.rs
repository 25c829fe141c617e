//! # nayra-db: Local Storage for Nayra POS
//!
//! The durable local side of the offline-tolerant cache: a key/value store
//! (SQLite, or in-memory for tests) holding JSON snapshots of every
//! collection plus the queues and markers the sync layer needs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Nayra POS Data Flow                              │
//! │                                                                         │
//! │  Collection manager (nayra-sync)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     nayra-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  LocalCache   │    │ Repositories  │    │   Database   │  │   │
//! │  │   │  (cache.rs)   │───►│ pending queue │    │   (pool.rs)  │  │   │
//! │  │   │ read / write  │    │ tombstones    │    │  kv_store    │  │   │
//! │  │   │ clear_all     │    │ backup, role  │    │  migrations  │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────▲───────┘  │   │
//! │  │           │        KeyValueStore (store.rs)        │          │   │
//! │  │           └────────────────────────────────────────┘          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - SQLite pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`store`] - `KeyValueStore` trait, SQLite and in-memory stores
//! - [`keys`] - Storage keys and entity traits
//! - [`cache`] - `LocalCache` snapshots
//! - [`repository`] - Pending queues, tombstones, backup, session, sync state
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nayra_db::{Database, DbConfig, LocalCache};
//!
//! let db = Database::new(DbConfig::new("nayra.db")).await?;
//! let cache = LocalCache::new(Arc::new(db));
//!
//! let products: Vec<Product> = cache.read().await?;
//! cache.pending::<Sale>().enqueue(&sale).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod error;
pub mod keys;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::LocalCache;
pub use error::{DbError, DbResult};
pub use keys::{CachedEntity, QueuedEntity, RemovableEntity};
pub use pool::{Database, DbConfig};
pub use repository::{
    BackupRepository, PendingQueue, SessionRepository, SyncStateRepository, TombstoneRepository,
};
pub use store::{KeyValueStore, MemoryStore};

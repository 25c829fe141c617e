//! # nayra-sync: Deferred Sync for Nayra POS
//!
//! Local-first collection managers with best-effort write-through to the
//! hosted store, and replay of everything written offline on reconnect.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Sync Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 SyncContext (shared by all managers)             │  │
//! │  │  LocalCache · SyncAdapter · Connectivity · SyncTracker · locks  │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ ProductManager │  │  SaleManager   │  │   SummaryManager       │    │
//! │  │ add / remove   │  │ add / record   │  │ add / remove / generate│    │
//! │  │ save_all /edit │  │ (append-only)  │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ ConnectivityPr.│─►│ Connectivity   │─►│ ConnectivityMonitor    │    │
//! │  │ ping interval  │  │ (watch<bool>)  │  │ online ⇒ Reconciler    │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  STATUS EVENTS (SyncEventEmitter):                                     │
//! │  • online / offline transitions                                        │
//! │  • reconcile reports                                                   │
//! │  • reconcile errors                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Application configuration (TOML + `NAYRA_*` env)
//! - [`error`] - `RemoteError` and `SyncError`
//! - [`remote`] - `RemoteStore` trait, PostgREST client, in-memory remote
//! - [`adapter`] - Typed per-collection remote calls
//! - [`manager`] - Collection managers and `Outcome`
//! - [`outbox`] - Reconciler: tombstones, queue drain, snapshot push
//! - [`backup`] - Backup slot and restore
//! - [`connectivity`], [`monitor`], [`probe`] - Online/offline handling
//! - [`tracker`] - Per-collection sync state
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nayra_db::{LocalCache, MemoryStore};
//! use nayra_sync::{Connectivity, MemoryRemote, SyncAdapter, SyncContext};
//!
//! let ctx = SyncContext::new(
//!     LocalCache::new(Arc::new(MemoryStore::new())),
//!     SyncAdapter::new(Arc::new(MemoryRemote::new())),
//!     Connectivity::new(false),
//! );
//!
//! let added = ctx.products().add(new_product).await?;
//! println!("{} ({})", added.value.name, added.sync);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod adapter;
pub mod backup;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod manager;
pub mod monitor;
pub mod outbox;
pub mod probe;
pub mod remote;
pub mod tracker;

// =============================================================================
// Re-exports
// =============================================================================

pub use adapter::SyncAdapter;
pub use backup::{BackupService, RestoreStatus};
pub use config::AppConfig;
pub use connectivity::Connectivity;
pub use error::{RemoteError, RemoteResult, SyncError, SyncResult};
pub use manager::{Outcome, ProductManager, SaleManager, SummaryManager, SyncContext, SyncOutcome};
pub use monitor::{ConnectivityMonitor, MonitorHandle, NoOpEmitter, SyncEventEmitter};
pub use outbox::{CollectionReport, ReconcileReport, Reconciler};
pub use probe::{ConnectivityProbe, ProbeHandle};
pub use remote::{MemoryRemote, RemoteStore, RestClient};
pub use tracker::SyncTracker;

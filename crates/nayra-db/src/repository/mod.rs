//! # Repository Module
//!
//! Typed access to the non-snapshot keys of the local store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cache.pending::<Sale>()        ──► PendingQueue        nayra_pending_* │
//! │  cache.tombstones::<Product>()  ──► TombstoneRepository nayra_*_removed │
//! │  cache.backups()                ──► BackupRepository    nayra_backup    │
//! │  cache.session()                ──► SessionRepository   userRole        │
//! │  cache.sync_states()            ──► SyncStateRepository nayra_sync_state│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod backup;
pub mod pending;
pub mod session;
pub mod sync_state;
pub mod tombstone;

pub use backup::BackupRepository;
pub use pending::PendingQueue;
pub use session::SessionRepository;
pub use sync_state::SyncStateRepository;
pub use tombstone::TombstoneRepository;

//! # Collection Managers
//!
//! Get-all / add / remove / save for products, sales and summaries, composed
//! from the local cache and the sync adapter.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   command ──► Manager ──► lock(collection)                             │
//! │                  │                                                      │
//! │                  ├── online ──► SyncAdapter ──ok──► Outcome::Synced    │
//! │                  │                  │                                   │
//! │                  │                  └─err──► queue/tombstone,          │
//! │                  │                          mark DirtyLocal,           │
//! │                  │                          Outcome::Failed            │
//! │                  │                                                      │
//! │                  ├── offline ─► queue/tombstone, mark DirtyLocal       │
//! │                  │                                                      │
//! │                  └── always ──► LocalCache.write(full snapshot)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read Path
//! `get_all` refreshes from the remote store only while the collection is
//! `Synced`; with local changes pending it serves the cache so a remote read
//! cannot clobber them.

mod outcome;
mod products;
mod sales;
mod summaries;

pub use outcome::{Outcome, SyncOutcome};
pub use products::ProductManager;
pub use sales::SaleManager;
pub use summaries::SummaryManager;

use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use nayra_core::{Collection, SyncState};
use nayra_db::LocalCache;

use crate::adapter::SyncAdapter;
use crate::connectivity::Connectivity;
use crate::error::SyncResult;
use crate::remote::SyncRecord;
use crate::tracker::SyncTracker;

#[derive(Debug, Default)]
struct CollectionLocks {
    products: Mutex<()>,
    sales: Mutex<()>,
    summaries: Mutex<()>,
}

/// Everything a manager needs. Cheap to clone; clones share the locks.
#[derive(Clone)]
pub struct SyncContext {
    cache: LocalCache,
    adapter: SyncAdapter,
    connectivity: Connectivity,
    tracker: SyncTracker,
    locks: Arc<CollectionLocks>,
}

impl fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncContext")
            .field("online", &self.connectivity.is_online())
            .finish_non_exhaustive()
    }
}

impl SyncContext {
    pub fn new(cache: LocalCache, adapter: SyncAdapter, connectivity: Connectivity) -> Self {
        let tracker = SyncTracker::new(cache.sync_states());
        Self {
            cache,
            adapter,
            connectivity,
            tracker,
            locks: Arc::default(),
        }
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    pub fn adapter(&self) -> &SyncAdapter {
        &self.adapter
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn tracker(&self) -> &SyncTracker {
        &self.tracker
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    pub fn products(&self) -> ProductManager {
        ProductManager::new(self.clone())
    }

    pub fn sales(&self) -> SaleManager {
        SaleManager::new(self.clone())
    }

    pub fn summaries(&self) -> SummaryManager {
        SummaryManager::new(self.clone())
    }

    /// Serializes read-modify-write cycles on one collection.
    pub(crate) async fn lock(&self, collection: Collection) -> MutexGuard<'_, ()> {
        match collection {
            Collection::Products => self.locks.products.lock().await,
            Collection::Sales => self.locks.sales.lock().await,
            Collection::Summaries => self.locks.summaries.lock().await,
        }
    }

    /// Shared `get_all` for every collection.
    pub(crate) async fn get_all<T: SyncRecord>(&self) -> SyncResult<Outcome<Vec<T>>> {
        let _guard = self.lock(T::COLLECTION).await;

        if !self.is_online() {
            return Ok(Outcome::offline(self.cache.read().await?));
        }

        let state = self.tracker.state(T::COLLECTION).await?;
        if state != SyncState::Synced {
            debug!(collection = %T::COLLECTION, %state, "Serving cache until local changes are pushed");
            return Ok(Outcome::new(self.cache.read().await?, SyncOutcome::Queued));
        }

        match self.adapter.fetch_all::<T>().await {
            Ok(records) => {
                self.cache.write(&records).await?;
                Ok(Outcome::synced(records))
            }
            Err(e) => {
                warn!(collection = %T::COLLECTION, error = %e, "Remote fetch failed, serving cache");
                Ok(Outcome::new(self.cache.read().await?, SyncOutcome::failed(&e)))
            }
        }
    }
}

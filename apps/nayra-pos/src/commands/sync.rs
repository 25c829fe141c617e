//! # Sync Commands
//!
//! Connectivity and per-collection sync state, plus a manual reconcile.
//!
//! ```text
//! {
//!   "online": false,
//!   "collections": [
//!     { "collection": "products",  "state": "dirty_local", "pending": 0, "removals": 1 },
//!     { "collection": "sales",     "state": "dirty_local", "pending": 3, "removals": 0 },
//!     { "collection": "summaries", "state": "synced",      "pending": 0, "removals": 0 }
//!   ]
//! }
//! ```

use serde::Serialize;

use nayra_core::{Collection, DailySummary, Product, Route, Sale, SyncState};
use nayra_sync::{ReconcileReport, Reconciler};

use crate::error::ApiError;
use crate::state::{AppState, SessionContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStatusDto {
    pub collection: Collection,
    pub state: SyncState,
    /// Records waiting in the pending queue.
    pub pending: usize,
    /// Remote deletions not yet applied.
    pub removals: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusDto {
    pub online: bool,
    pub collections: Vec<CollectionStatusDto>,
}

pub async fn sync_status(
    state: &AppState,
    session: &SessionContext,
) -> Result<SyncStatusDto, ApiError> {
    session.require(Route::Dashboard)?;

    let ctx = state.ctx();
    let cache = ctx.cache();
    let states = ctx.tracker().all().await?;

    let mut collections = Vec::with_capacity(Collection::ALL.len());
    for collection in Collection::ALL {
        let (pending, removals) = match collection {
            Collection::Products => (0, cache.tombstones::<Product>().all().await?.len()),
            Collection::Sales => (cache.pending::<Sale>().len().await?, 0),
            Collection::Summaries => (
                cache.pending::<DailySummary>().len().await?,
                cache.tombstones::<DailySummary>().all().await?.len(),
            ),
        };
        collections.push(CollectionStatusDto {
            collection,
            state: states.get(&collection).copied().unwrap_or_default(),
            pending,
            removals,
        });
    }

    Ok(SyncStatusDto {
        online: ctx.is_online(),
        collections,
    })
}

/// Pushes everything written offline. Refused while offline.
pub async fn reconcile(
    state: &AppState,
    session: &SessionContext,
) -> Result<ReconcileReport, ApiError> {
    session.require(Route::Dashboard)?;

    if !state.ctx().is_online() {
        return Err(ApiError::offline("reconcile"));
    }
    Ok(Reconciler::new(state.ctx().clone()).reconcile().await?)
}

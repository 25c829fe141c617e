//! # Sync State Tracker
//!
//! Moves each collection through `Synced → DirtyLocal → Syncing → …`
//! and persists the state so it survives a restart.

use std::collections::BTreeMap;
use tracing::debug;

use nayra_core::{Collection, SyncState};
use nayra_db::{DbResult, SyncStateRepository};

#[derive(Debug, Clone)]
pub struct SyncTracker {
    states: SyncStateRepository,
}

impl SyncTracker {
    pub fn new(states: SyncStateRepository) -> Self {
        Self { states }
    }

    pub async fn state(&self, collection: Collection) -> DbResult<SyncState> {
        self.states.get(collection).await
    }

    pub async fn all(&self) -> DbResult<BTreeMap<Collection, SyncState>> {
        let stored = self.states.load().await?;
        Ok(Collection::ALL
            .into_iter()
            .map(|c| (c, stored.get(&c).copied().unwrap_or_default()))
            .collect())
    }

    /// True if any collection has local changes the remote has not seen.
    pub async fn any_dirty(&self) -> DbResult<bool> {
        Ok(self.all().await?.values().any(|s| *s != SyncState::Synced))
    }

    pub async fn mark_dirty(&self, collection: Collection) -> DbResult<()> {
        if self.state(collection).await? != SyncState::DirtyLocal {
            debug!(%collection, "Collection has unsynced local changes");
            self.states.set(collection, SyncState::DirtyLocal).await?;
        }
        Ok(())
    }

    pub async fn begin(&self, collection: Collection) -> DbResult<()> {
        self.states.set(collection, SyncState::Syncing).await
    }

    /// Ends a reconcile pass: `Synced` if every replay succeeded.
    pub async fn finish(&self, collection: Collection, all_ok: bool) -> DbResult<SyncState> {
        let state = if all_ok {
            SyncState::Synced
        } else {
            SyncState::DirtyLocal
        };
        self.states.set(collection, state).await?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nayra_db::{LocalCache, MemoryStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_transitions() {
        let tracker = SyncTracker::new(LocalCache::new(Arc::new(MemoryStore::new())).sync_states());
        assert!(!tracker.any_dirty().await.unwrap());

        tracker.mark_dirty(Collection::Sales).await.unwrap();
        assert!(tracker.any_dirty().await.unwrap());

        tracker.begin(Collection::Sales).await.unwrap();
        assert_eq!(tracker.state(Collection::Sales).await.unwrap(), SyncState::Syncing);

        assert_eq!(
            tracker.finish(Collection::Sales, false).await.unwrap(),
            SyncState::DirtyLocal
        );
        assert_eq!(
            tracker.finish(Collection::Sales, true).await.unwrap(),
            SyncState::Synced
        );
        assert_eq!(tracker.all().await.unwrap().len(), 3);
        assert!(!tracker.any_dirty().await.unwrap());
    }
}

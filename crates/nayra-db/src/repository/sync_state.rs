//! # Sync State Repository
//!
//! Persists the per-collection [`SyncState`] so a restart while offline
//! still knows which snapshots hold unsynced changes.

use std::collections::BTreeMap;

use nayra_core::{Collection, SyncState};

use crate::cache::LocalCache;
use crate::error::DbResult;
use crate::keys::SYNC_STATE_KEY;

#[derive(Debug, Clone)]
pub struct SyncStateRepository {
    cache: LocalCache,
}

impl SyncStateRepository {
    pub fn new(cache: LocalCache) -> Self {
        Self { cache }
    }

    /// Loads every recorded state. Collections never recorded are absent.
    pub async fn load(&self) -> DbResult<BTreeMap<Collection, SyncState>> {
        Ok(self.cache.read_json(SYNC_STATE_KEY).await?.unwrap_or_default())
    }

    /// State of one collection; [`SyncState::Synced`] if never recorded.
    pub async fn get(&self, collection: Collection) -> DbResult<SyncState> {
        Ok(self.load().await?.get(&collection).copied().unwrap_or_default())
    }

    pub async fn set(&self, collection: Collection, state: SyncState) -> DbResult<()> {
        let mut states = self.load().await?;
        states.insert(collection, state);
        self.cache.write_json(SYNC_STATE_KEY, &states).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_defaults_to_synced_and_persists() {
        let store = MemoryStore::new();
        let states = LocalCache::new(Arc::new(store.clone())).sync_states();
        assert_eq!(states.get(Collection::Sales).await.unwrap(), SyncState::Synced);

        states.set(Collection::Sales, SyncState::DirtyLocal).await.unwrap();

        let reopened = LocalCache::new(Arc::new(store)).sync_states();
        assert_eq!(reopened.get(Collection::Sales).await.unwrap(), SyncState::DirtyLocal);
        assert_eq!(reopened.get(Collection::Products).await.unwrap(), SyncState::Synced);
    }
}

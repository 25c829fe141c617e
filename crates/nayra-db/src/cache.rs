//! # Local Cache
//!
//! Whole-collection snapshots on top of a [`KeyValueStore`].
//!
//! ## Read-Modify-Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  There is no partial update: every mutation rewrites the snapshot.     │
//! │                                                                         │
//! │   read::<Product>()  ──►  Vec<Product>  ──► push / retain / edit        │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                              write::<Product>(&list) ── overwrites      │
//! │                                                                         │
//! │  A key that was never written reads as an empty collection.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers that may race on the same collection must serialize their
//! read-modify-write cycles (the sync managers hold a per-collection lock).

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::keys::{CachedEntity, QueuedEntity, RemovableEntity, ALL_KEYS};
use crate::repository::{
    BackupRepository, PendingQueue, SessionRepository, SyncStateRepository, TombstoneRepository,
};
use crate::store::KeyValueStore;

/// Typed JSON access to the durable store.
#[derive(Clone)]
pub struct LocalCache {
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for LocalCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalCache").finish_non_exhaustive()
    }
}

impl LocalCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    // =========================================================================
    // JSON Values
    // =========================================================================

    /// Reads and decodes the value under `key`.
    pub async fn read_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.store.get(key).await? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| DbError::serialization(key, e)),
        }
    }

    /// Encodes `value` and stores it under `key`.
    pub async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| DbError::serialization(key, e))?;
        self.store.put(key, &raw).await
    }

    /// Removes the value under `key`.
    pub async fn remove(&self, key: &str) -> DbResult<()> {
        self.store.remove(key).await
    }

    // =========================================================================
    // Collection Snapshots
    // =========================================================================

    /// Reads the snapshot of `T`'s collection (empty if never written).
    pub async fn read<T: CachedEntity>(&self) -> DbResult<Vec<T>> {
        let entities: Vec<T> = self.read_json(T::snapshot_key()).await?.unwrap_or_default();
        debug!(
            collection = %T::COLLECTION,
            count = entities.len(),
            "Read cache snapshot"
        );
        Ok(entities)
    }

    /// Overwrites the snapshot of `T`'s collection.
    pub async fn write<T: CachedEntity>(&self, entities: &[T]) -> DbResult<()> {
        debug!(
            collection = %T::COLLECTION,
            count = entities.len(),
            "Writing cache snapshot"
        );
        self.write_json(T::snapshot_key(), entities).await
    }

    /// Removes every application key: snapshots, queues, tombstones, sync
    /// state, backup and the session role.
    pub async fn clear_all(&self) -> DbResult<()> {
        let stored = self.store.keys().await?;
        let mut removed = 0usize;
        for key in stored
            .iter()
            .filter(|k| ALL_KEYS.contains(&k.as_str()) || k.starts_with("nayra_"))
        {
            self.store.remove(key).await?;
            removed += 1;
        }
        info!(removed, "Cleared all local data");
        Ok(())
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    /// Returns the pending-write queue of `T`.
    pub fn pending<T: QueuedEntity>(&self) -> PendingQueue<T> {
        PendingQueue::new(self.clone())
    }

    /// Returns the offline-removal tombstones of `T`.
    pub fn tombstones<T: RemovableEntity>(&self) -> TombstoneRepository<T> {
        TombstoneRepository::new(self.clone())
    }

    pub fn backups(&self) -> BackupRepository {
        BackupRepository::new(self.clone())
    }

    pub fn session(&self) -> SessionRepository {
        SessionRepository::new(self.clone())
    }

    pub fn sync_states(&self) -> SyncStateRepository {
        SyncStateRepository::new(self.clone())
    }
}

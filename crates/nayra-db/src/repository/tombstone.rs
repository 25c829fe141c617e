//! # Removal Tombstones
//!
//! Keys of entities removed while offline, so the removal can be replayed
//! against the remote store on reconnect. Without them the next remote read
//! would bring the removed entity back.

use std::marker::PhantomData;
use tracing::debug;

use crate::cache::LocalCache;
use crate::error::DbResult;
use crate::keys::RemovableEntity;

/// Tombstone list for one entity type.
#[derive(Debug, Clone)]
pub struct TombstoneRepository<T> {
    cache: LocalCache,
    _entity: PhantomData<fn() -> T>,
}

impl<T: RemovableEntity> TombstoneRepository<T> {
    pub fn new(cache: LocalCache) -> Self {
        Self {
            cache,
            _entity: PhantomData,
        }
    }

    /// Returns every recorded removal key, oldest first.
    pub async fn all(&self) -> DbResult<Vec<String>> {
        Ok(self.cache.read_json(T::TOMBSTONE_KEY).await?.unwrap_or_default())
    }

    /// Records a removal. A key already recorded is not added twice.
    pub async fn add(&self, key: &str) -> DbResult<()> {
        let mut keys = self.all().await?;
        if keys.iter().any(|k| k == key) {
            return Ok(());
        }
        keys.push(key.to_string());
        debug!(collection = %T::COLLECTION, key, "Recorded tombstone");
        self.cache.write_json(T::TOMBSTONE_KEY, &keys).await
    }

    /// Drops the given keys once their removal reached the remote store.
    pub async fn acknowledge(&self, done: &[String]) -> DbResult<()> {
        if done.is_empty() {
            return Ok(());
        }
        let mut keys = self.all().await?;
        keys.retain(|k| !done.contains(k));
        if keys.is_empty() {
            self.cache.remove(T::TOMBSTONE_KEY).await
        } else {
            self.cache.write_json(T::TOMBSTONE_KEY, &keys).await
        }
    }
}

//! # Pending-Write Queue
//!
//! Durable FIFO of inserts the remote store has not confirmed yet.
//!
//! ## The Queue
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  record sale (offline)          record sale (online, insert failed)    │
//! │          │                                   │                          │
//! │          └──────────────┬────────────────────┘                          │
//! │                         ▼                                               │
//! │                 enqueue(sale) ── appends, never reorders                │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  nayra_pending_sync: [ s1, s2, s3 ]                                    │
//! │                         │                                               │
//! │                         ▼  reconnect                                    │
//! │        all() ──► replay in order ──► remove_replayed([s1, s3])          │
//! │                                                                         │
//! │  nayra_pending_sync: [ s2, (anything enqueued during the replay) ]     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Replay takes a copy of the queue and removes only what it confirmed, so
//! records appended while it runs are never lost.

use std::marker::PhantomData;
use tracing::debug;

use crate::cache::LocalCache;
use crate::error::DbResult;
use crate::keys::QueuedEntity;

/// Pending-write queue for one entity type.
#[derive(Debug, Clone)]
pub struct PendingQueue<T> {
    cache: LocalCache,
    _entity: PhantomData<fn() -> T>,
}

impl<T: QueuedEntity> PendingQueue<T> {
    pub fn new(cache: LocalCache) -> Self {
        Self {
            cache,
            _entity: PhantomData,
        }
    }

    /// Returns every queued record, oldest first.
    pub async fn all(&self) -> DbResult<Vec<T>> {
        Ok(self.cache.read_json(T::PENDING_KEY).await?.unwrap_or_default())
    }

    pub async fn len(&self) -> DbResult<usize> {
        Ok(self.all().await?.len())
    }

    pub async fn is_empty(&self) -> DbResult<bool> {
        Ok(self.all().await?.is_empty())
    }

    /// Appends a record to the end of the queue.
    pub async fn enqueue(&self, record: &T) -> DbResult<()> {
        let mut queue = self.all().await?;
        queue.push(record.clone());
        debug!(
            collection = %T::COLLECTION,
            queued = queue.len(),
            "Enqueued pending write"
        );
        self.write(&queue).await
    }

    /// Removes one queued copy of each replayed record, keeping the order of
    /// the rest.
    pub async fn remove_replayed(&self, replayed: &[T]) -> DbResult<()> {
        if replayed.is_empty() {
            return Ok(());
        }

        let mut queue = self.all().await?;
        for record in replayed {
            if let Some(pos) = queue.iter().position(|queued| queued == record) {
                queue.remove(pos);
            }
        }
        self.write(&queue).await
    }

    /// Keeps only the records matching `keep`.
    pub async fn retain<F>(&self, keep: F) -> DbResult<usize>
    where
        F: Fn(&T) -> bool,
    {
        let mut queue = self.all().await?;
        let before = queue.len();
        queue.retain(|r| keep(r));
        let dropped = before - queue.len();
        if dropped > 0 {
            self.write(&queue).await?;
        }
        Ok(dropped)
    }

    /// Empties the queue.
    pub async fn clear(&self) -> DbResult<()> {
        self.cache.remove(T::PENDING_KEY).await
    }

    async fn write(&self, queue: &[T]) -> DbResult<()> {
        if queue.is_empty() {
            self.cache.remove(T::PENDING_KEY).await
        } else {
            self.cache.write_json(T::PENDING_KEY, queue).await
        }
    }
}

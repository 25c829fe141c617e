//! # Backup Repository
//!
//! The single backup slot. Every backup overwrites the previous one.

use tracing::info;

use nayra_core::BackupEnvelope;

use crate::cache::LocalCache;
use crate::error::DbResult;
use crate::keys::BACKUP_KEY;

#[derive(Debug, Clone)]
pub struct BackupRepository {
    cache: LocalCache,
}

impl BackupRepository {
    pub fn new(cache: LocalCache) -> Self {
        Self { cache }
    }

    /// Stores `envelope`, replacing any earlier backup.
    pub async fn save(&self, envelope: &BackupEnvelope) -> DbResult<()> {
        info!(
            products = envelope.products.len(),
            sales = envelope.sales.len(),
            summaries = envelope.summaries.len(),
            "Saving backup"
        );
        self.cache.write_json(BACKUP_KEY, envelope).await
    }

    /// Returns the stored backup, if one exists.
    pub async fn load(&self) -> DbResult<Option<BackupEnvelope>> {
        self.cache.read_json(BACKUP_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_save_overwrites() {
        let backups = LocalCache::new(Arc::new(MemoryStore::new())).backups();
        assert!(backups.load().await.unwrap().is_none());

        let first = BackupEnvelope {
            products: vec![],
            sales: vec![],
            summaries: vec![],
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let mut second = first.clone();
        second.timestamp = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        backups.save(&first).await.unwrap();
        backups.save(&second).await.unwrap();
        assert_eq!(backups.load().await.unwrap(), Some(second));
    }
}

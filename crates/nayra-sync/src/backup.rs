//! # Backup / Restore
//!
//! One backup slot holding all three collections. Taking a backup reads
//! through the managers (so it is as fresh as connectivity allows);
//! restoring writes the three local snapshots back and nothing else.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use nayra_core::{BackupEnvelope, Collection};

use crate::error::SyncResult;
use crate::manager::SyncContext;

/// Whether a restore found anything to restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RestoreStatus {
    Restored { created_at: DateTime<Utc> },
    NoBackup,
}

#[derive(Debug, Clone)]
pub struct BackupService {
    ctx: SyncContext,
}

impl BackupService {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    /// Snapshots all three collections into the backup slot, replacing the
    /// previous backup.
    pub async fn backup(&self) -> SyncResult<BackupEnvelope> {
        let envelope = BackupEnvelope {
            products: self.ctx.products().get_all().await?.value,
            sales: self.ctx.sales().get_all().await?.value,
            summaries: self.ctx.summaries().get_all().await?.value,
            timestamp: Utc::now(),
        };
        self.ctx.cache().backups().save(&envelope).await?;
        Ok(envelope)
    }

    /// Overwrites the three cached collections with the stored backup.
    ///
    /// With no backup stored nothing is touched.
    pub async fn restore(&self) -> SyncResult<RestoreStatus> {
        let Some(backup) = self.ctx.cache().backups().load().await? else {
            warn!("Restore requested but no backup exists");
            return Ok(RestoreStatus::NoBackup);
        };

        {
            let _guard = self.ctx.lock(Collection::Products).await;
            self.ctx.cache().write(&backup.products).await?;
        }
        {
            let _guard = self.ctx.lock(Collection::Sales).await;
            self.ctx.cache().write(&backup.sales).await?;
        }
        {
            let _guard = self.ctx.lock(Collection::Summaries).await;
            self.ctx.cache().write(&backup.summaries).await?;
        }

        info!(created_at = %backup.timestamp, "Restored from backup");
        Ok(RestoreStatus::Restored {
            created_at: backup.timestamp,
        })
    }

    /// When the stored backup was taken, if there is one.
    pub async fn last_backup_at(&self) -> SyncResult<Option<DateTime<Utc>>> {
        Ok(self.ctx.cache().backups().load().await?.map(|b| b.timestamp))
    }
}

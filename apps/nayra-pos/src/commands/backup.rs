//! # Backup Commands
//!
//! Settings screen (admin): one backup slot for all three collections.

use chrono::{DateTime, Utc};
use serde::Serialize;

use nayra_core::Route;
use nayra_sync::{BackupService, RestoreStatus};

use crate::error::ApiError;
use crate::state::{AppState, SessionContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDto {
    pub timestamp: DateTime<Utc>,
    pub products: usize,
    pub sales: usize,
    pub summaries: usize,
}

/// Snapshots products, sales and summaries, replacing the previous backup.
pub async fn backup(state: &AppState, session: &SessionContext) -> Result<BackupDto, ApiError> {
    session.require(Route::Settings)?;

    let envelope = BackupService::new(state.ctx().clone()).backup().await?;
    Ok(BackupDto {
        timestamp: envelope.timestamp,
        products: envelope.products.len(),
        sales: envelope.sales.len(),
        summaries: envelope.summaries.len(),
    })
}

/// Overwrites the local collections with the stored backup.
///
/// Fails with `NOT_FOUND` when no backup has been taken; nothing is changed
/// in that case.
pub async fn restore(
    state: &AppState,
    session: &SessionContext,
) -> Result<DateTime<Utc>, ApiError> {
    session.require(Route::Settings)?;

    match BackupService::new(state.ctx().clone()).restore().await? {
        RestoreStatus::Restored { created_at } => Ok(created_at),
        RestoreStatus::NoBackup => Err(ApiError::not_found("Backup", "no backup has been taken")),
    }
}

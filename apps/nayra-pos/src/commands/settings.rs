//! # Settings Commands
//!
//! Destructive maintenance on the local store (admin only).

use tracing::warn;

use nayra_core::Route;

use crate::error::ApiError;
use crate::state::{AppState, SessionContext};

/// Deletes every locally stored collection, queue, backup and the session.
///
/// The remote store is not touched. The operator has to log in again.
pub async fn clear_local_data(
    state: &AppState,
    session: &mut SessionContext,
) -> Result<(), ApiError> {
    session.require(Route::Settings)?;

    warn!("Clearing all local data");
    state.ctx().cache().clear_all().await?;
    session.logout().await
}

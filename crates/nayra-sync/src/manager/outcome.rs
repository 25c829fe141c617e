//! # Operation Outcomes
//!
//! Remote failures never surface as `Err`. Every manager call instead
//! returns its value together with what happened on the remote side.
//!
//! ```text
//! ┌──────────┬──────────────────────────────────────────────────────────────┐
//! │ Synced   │ The remote store accepted the call (or served the read).    │
//! │ Offline  │ No remote call was attempted; the change is local only.     │
//! │ Queued   │ The record waits in a pending queue, or the read came from  │
//! │          │ the cache because local changes are not yet pushed.         │
//! │ Failed   │ The remote call was attempted and failed; local state kept. │
//! └──────────┴──────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;

use crate::error::RemoteError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    Synced,
    Offline,
    Queued,
    Failed { reason: String },
}

impl SyncOutcome {
    pub fn failed(err: &RemoteError) -> Self {
        SyncOutcome::Failed {
            reason: err.to_string(),
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced)
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Synced => write!(f, "synced"),
            SyncOutcome::Offline => write!(f, "saved locally (offline)"),
            SyncOutcome::Queued => write!(f, "queued for sync"),
            SyncOutcome::Failed { reason } => write!(f, "saved locally, sync failed: {}", reason),
        }
    }
}

/// A manager result paired with its [`SyncOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<T> {
    pub value: T,
    pub sync: SyncOutcome,
}

impl<T> Outcome<T> {
    pub fn new(value: T, sync: SyncOutcome) -> Self {
        Self { value, sync }
    }

    pub fn synced(value: T) -> Self {
        Self::new(value, SyncOutcome::Synced)
    }

    pub fn offline(value: T) -> Self {
        Self::new(value, SyncOutcome::Offline)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            sync: self.sync,
        }
    }
}

//! # Sync Error Types
//!
//! Error types for remote calls and sync operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌──────────────────────────┐    ┌──────────────────────────────────┐  │
//! │  │       RemoteError        │    │            SyncError             │  │
//! │  │                          │    │                                  │  │
//! │  │  Unauthorized            │    │  InvalidConfig / InvalidUrl      │  │
//! │  │  NotFound / Conflict     │    │  ConfigLoadFailed / SaveFailed   │  │
//! │  │  RateLimited             │    │  Storage (DbError)               │  │
//! │  │  ServerError             │    │  Validation / Core               │  │
//! │  │  Network (reqwest)       │    │  ChannelError / Internal         │  │
//! │  │  Unavailable             │    │                                  │  │
//! │  └────────────┬─────────────┘    └──────────────────────────────────┘  │
//! │               │                                                         │
//! │               ▼ caught at the manager boundary                          │
//! │       SyncOutcome::Failed { reason }  (logged, never returned as Err)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use nayra_core::{CoreError, ValidationError};
use nayra_db::DbError;

// =============================================================================
// Remote Error
// =============================================================================

/// Result type alias for remote store calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// A failed call to the remote store (network or server).
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Unauthorized - check the remote API key")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited by the remote store")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The remote store could not be reached at all.
    #[error("Remote store unavailable: {0}")]
    Unavailable(String),
}

/// Maximum length for error response bodies in error messages.
const MAX_ERROR_BODY_LENGTH: usize = 300;

impl RemoteError {
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Maps a non-success HTTP status and body to an error.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => RemoteError::Unauthorized,
            403 => RemoteError::AccessDenied(truncated),
            404 => RemoteError::NotFound(truncated),
            409 => RemoteError::Conflict(truncated),
            429 => RemoteError::RateLimited,
            500..=599 => RemoteError::ServerError(truncated),
            _ => RemoteError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

// =============================================================================
// Sync Error
// =============================================================================

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors surfaced by the sync layer. Remote failures are not among them.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid remote URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Local storage failed; the cache may not reflect the last operation.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

impl SyncError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::InvalidUrl(_)
                | SyncError::ConfigLoadFailed(_)
                | SyncError::ConfigSaveFailed(_)
        )
    }
}

//! # API Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Nayra POS                              │
//! │                                                                         │
//! │  Command Function  ──►  Result<T, ApiError>                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Route check?       ─── CoreError::AccessDenied ───────┐                │
//! │         │                                              │                │
//! │         ▼                                              │                │
//! │  Form validation?   ─── ValidationError ───────────────┤                │
//! │         │                                              ▼                │
//! │  Manager call?      ─── SyncError / DbError ──────► ApiError ──► stderr │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success (remote failures are an Outcome, not an error) ──► stdout      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both a machine-readable `code` and a human-readable `message` are
//! carried, so `--json` output can be scripted against.

use serde::Serialize;

use nayra_core::{CoreError, ValidationError};
use nayra_db::DbError;
use nayra_sync::SyncError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 6f1c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Login failed
    InvalidCredentials,

    /// The session may not open the requested screen
    AccessDenied,

    /// The action needs the remote store but the app is offline
    Offline,

    /// Local storage failed
    StorageError,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Spreadsheet could not be written
    ExportError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn offline(action: &str) -> Self {
        ApiError::new(
            ErrorCode::Offline,
            format!("Cannot {} while offline", action),
        )
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts local storage errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Local database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Local database migration failed")
            }
            DbError::QuotaExceeded { key, .. } => ApiError::new(
                ErrorCode::StorageError,
                format!("Local storage is full (writing '{}')", key),
            ),
            DbError::Serialization { key, source } => {
                tracing::error!(key = %key, error = %source, "Stored value is unreadable");
                ApiError::new(
                    ErrorCode::StorageError,
                    format!("Stored data for '{}' is unreadable", key),
                )
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!(error = %other, "Local storage operation failed");
                ApiError::new(ErrorCode::StorageError, "Local storage operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::InvalidCredentials => {
                ApiError::new(ErrorCode::InvalidCredentials, "Invalid username or password")
            }
            CoreError::AccessDenied { route, redirect } => ApiError::new(
                ErrorCode::AccessDenied,
                format!("Cannot open {}; redirected to {}", route, redirect),
            ),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts sync-layer errors to API errors.
impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        if err.is_config_error() {
            return ApiError::new(ErrorCode::ConfigError, err.to_string());
        }
        match err {
            SyncError::Storage(e) => e.into(),
            SyncError::Validation(e) => e.into(),
            SyncError::Core(e) => e.into(),
            other => {
                tracing::error!(error = %other, "Sync operation failed");
                ApiError::internal(other.to_string())
            }
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ApiError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ApiError::new(ErrorCode::ExportError, format!("Failed to write workbook: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

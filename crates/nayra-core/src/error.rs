//! # Error Types
//!
//! Domain-specific error types for nayra-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nayra-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  nayra-db errors                                                       │
//! │  └── DbError          - Local storage failures (fatal)                 │
//! │                                                                         │
//! │  nayra-sync errors                                                     │
//! │  ├── RemoteError      - Network/server failures (never surfaced)       │
//! │  └── SyncError        - Config, storage, validation                    │
//! │                                                                         │
//! │  nayra-pos errors                                                      │
//! │  └── ApiError         - What the operator sees                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The credentials did not match any account.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The session role does not allow the requested screen.
    ///
    /// ## When This Occurs
    /// ```text
    /// employee ──► /inventory ──► AccessDenied { route: "/inventory", redirect: "/" }
    /// (absent) ──► /sales     ──► AccessDenied { route: "/sales", redirect: "/login" }
    /// ```
    #[error("Access to {route} denied, redirecting to {redirect}")]
    AccessDenied { route: String, redirect: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These back the inline messages of the add-product and record-sale forms.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value exceeds an upper bound.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: i64 },

    /// Invalid format (e.g., unparseable amount or date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

//! # nayra-core: Pure Business Logic for Nayra POS
//!
//! Domain types and rules for the dairy point-of-sale, as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Nayra POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    nayra-pos (CLI)                              │   │
//! │  │    login, product add/edit, sale record, report, backup        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 nayra-sync (collection managers)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nayra-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌───────┐  │   │
//! │  │   │  types   │ │  money  │ │ summary  │ │ session │ │report │  │   │
//! │  │   │ Product  │ │  Money  │ │summarize │ │  guard  │ │ rows  │  │   │
//! │  │   │  Sale    │ │ (paise) │ │          │ │  Role   │ │       │  │   │
//! │  │   └──────────┘ └─────────┘ └──────────┘ └─────────┘ └───────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, Sale, DailySummary, BackupEnvelope
//! - [`money`] - Money type with integer paise
//! - [`error`] - Domain error types
//! - [`validation`] - Form validation rules
//! - [`summary`] - Daily summary aggregation
//! - [`session`] - Roles, accounts and the route guard
//! - [`update`] - Typed product field edits
//! - [`report`] - Daily report sheet layout
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use nayra_core::{summary::summarize, Money, Product, Sale, SaleType};
//!
//! let milk = Product {
//!     id: "milk".into(),
//!     name: "Milk".into(),
//!     stock: 200,
//!     price: Money::from_rupees(50),
//!     unit: "packet".into(),
//!     category: "milk".into(),
//! };
//! let at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
//! let sales = vec![
//!     Sale::record(&milk, 2, SaleType::Counter, at).unwrap(),
//!     Sale::record(&milk, 3, SaleType::Supply, at).unwrap(),
//! ];
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let summary = summarize(day, &sales, &[milk]);
//! assert_eq!(summary.total_sales, Money::from_rupees(250));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod session;
pub mod summary;
pub mod types;
pub mod update;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::{Access, Account, AccountTable, Role, Route};
pub use types::*;
pub use update::ProductUpdate;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Products with less stock than this are flagged "Low Stock".
pub const LOW_STOCK_THRESHOLD: i64 = 50;

//! Storage keys and the entity traits that map collections onto them.
//!
//! ```text
//! ┌───────────────────────────┬─────────────────────────────────────────────┐
//! │ Key                       │ Value (JSON)                                │
//! ├───────────────────────────┼─────────────────────────────────────────────┤
//! │ nayra_products            │ Product[]        (snapshot)                 │
//! │ nayra_sales               │ Sale[]           (snapshot)                 │
//! │ nayra_summaries           │ DailySummary[]   (snapshot)                 │
//! │ nayra_pending_sync        │ Sale[]           (unconfirmed inserts)      │
//! │ nayra_pending_summaries   │ DailySummary[]   (unconfirmed inserts)      │
//! │ nayra_products_removed    │ string[]         (ids deleted offline)      │
//! │ nayra_summaries_removed   │ string[]         (dates deleted offline)    │
//! │ nayra_sync_state          │ {collection: state}                         │
//! │ nayra_backup              │ BackupEnvelope                              │
//! │ userRole                  │ "admin" | "employee"                        │
//! └───────────────────────────┴─────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use nayra_core::{Collection, DailySummary, Product, Sale};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const PRODUCTS_KEY: &str = "nayra_products";
pub const SALES_KEY: &str = "nayra_sales";
pub const SUMMARIES_KEY: &str = "nayra_summaries";
pub const PENDING_SALES_KEY: &str = "nayra_pending_sync";
pub const PENDING_SUMMARIES_KEY: &str = "nayra_pending_summaries";
pub const PRODUCTS_REMOVED_KEY: &str = "nayra_products_removed";
pub const SUMMARIES_REMOVED_KEY: &str = "nayra_summaries_removed";
pub const SYNC_STATE_KEY: &str = "nayra_sync_state";
pub const BACKUP_KEY: &str = "nayra_backup";
pub const ROLE_KEY: &str = "userRole";

/// Every key the application writes.
pub const ALL_KEYS: [&str; 10] = [
    PRODUCTS_KEY,
    SALES_KEY,
    SUMMARIES_KEY,
    PENDING_SALES_KEY,
    PENDING_SUMMARIES_KEY,
    PRODUCTS_REMOVED_KEY,
    SUMMARIES_REMOVED_KEY,
    SYNC_STATE_KEY,
    BACKUP_KEY,
    ROLE_KEY,
];

/// Snapshot key of a collection.
pub const fn snapshot_key(collection: Collection) -> &'static str {
    match collection {
        Collection::Products => PRODUCTS_KEY,
        Collection::Sales => SALES_KEY,
        Collection::Summaries => SUMMARIES_KEY,
    }
}

/// Tombstone key of every summary stored for `date`.
pub fn summary_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// =============================================================================
// Entity Traits
// =============================================================================

/// An entity stored as a whole-collection snapshot.
pub trait CachedEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn snapshot_key() -> &'static str {
        snapshot_key(Self::COLLECTION)
    }
}

/// An entity whose inserts are queued while they cannot reach the remote store.
pub trait QueuedEntity: CachedEntity + PartialEq {
    const PENDING_KEY: &'static str;
}

/// An entity that can be removed, and so needs a tombstone while offline.
pub trait RemovableEntity: CachedEntity {
    const TOMBSTONE_KEY: &'static str;

    /// The value that identifies the entity for removal.
    fn removal_key(&self) -> String;
}

impl CachedEntity for Product {
    const COLLECTION: Collection = Collection::Products;
}

impl CachedEntity for Sale {
    const COLLECTION: Collection = Collection::Sales;
}

impl CachedEntity for DailySummary {
    const COLLECTION: Collection = Collection::Summaries;
}

impl QueuedEntity for Sale {
    const PENDING_KEY: &'static str = PENDING_SALES_KEY;
}

impl QueuedEntity for DailySummary {
    const PENDING_KEY: &'static str = PENDING_SUMMARIES_KEY;
}

impl RemovableEntity for Product {
    const TOMBSTONE_KEY: &'static str = PRODUCTS_REMOVED_KEY;

    fn removal_key(&self) -> String {
        self.id.clone()
    }
}

impl RemovableEntity for DailySummary {
    const TOMBSTONE_KEY: &'static str = SUMMARIES_REMOVED_KEY;

    fn removal_key(&self) -> String {
        summary_key(self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_keys() {
        assert_eq!(snapshot_key(Collection::Products), "nayra_products");
        assert_eq!(snapshot_key(Collection::Sales), "nayra_sales");
        assert_eq!(snapshot_key(Collection::Summaries), "nayra_summaries");
    }

    #[test]
    fn test_summary_key_is_calendar_day() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(summary_key(day), "2024-01-05");
    }
}

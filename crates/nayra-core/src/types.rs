//! # Domain Types
//!
//! Core domain types used throughout Nayra POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Product      │   │      Sale       │   │   DailySummary      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id (UUID)      │◄ ─│  product_id     │   │  date (identity)    │   │
//! │  │  name           │   │  quantity       │   │  total_sales        │   │
//! │  │  stock          │   │  amount (frozen)│   │  counter_sales      │   │
//! │  │  price          │   │  sale_type      │   │  supply_sales       │   │
//! │  │  unit, category │   │  timestamp      │   │  products[]         │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! │                                                                         │
//! │  Sale.product_id is a WEAK reference: the product may be gone.          │
//! │  Sale.amount is a snapshot of price × quantity at record time.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All types serialize with camelCase field names; that is the shape of the
//! local cache snapshots (`productId`, `totalSales`, ...).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

/// Display name used for sales whose product no longer exists.
pub const UNKNOWN_PRODUCT: &str = "Unknown";

/// Product categories offered by the add-product form: `(id, display name)`.
pub const CATEGORIES: [(&str, &str); 4] = [
    ("milk", "Milk Products"),
    ("curd", "Curd Products"),
    ("ice-cream", "Ice Cream"),
    ("dairy", "Other Dairy Products"),
];

/// Returns the display name of a category id, or the id itself when the
/// category is not one of the known ones.
pub fn category_display_name(category: &str) -> &str {
    CATEGORIES
        .iter()
        .find(|(id, _)| *id == category)
        .map(|(_, name)| *name)
        .unwrap_or(category)
}

/// Generates a fresh client-side identifier.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Collection
// =============================================================================

/// The three synchronized entity collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Products,
    Sales,
    Summaries,
}

impl Collection {
    /// Every collection, in the order reconciliation visits them.
    pub const ALL: [Collection; 3] = [Collection::Products, Collection::Sales, Collection::Summaries];

    /// Short name used in logs and persisted state.
    pub const fn name(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Sales => "sales",
            Collection::Summaries => "summaries",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a collection's local snapshot agrees with the remote store.
///
/// ```text
///            local write while offline / failed write-through
///   Synced ────────────────────────────────────────────────► DirtyLocal
///     ▲                                                          │
///     │ every queued record replayed               reconnect     │
///     │                                                          ▼
///     └──────────────────────────── Syncing ◄────────────────────┘
///                                      │
///                                      └── some replay failed ──► DirtyLocal
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    #[default]
    Synced,
    DirtyLocal,
    Syncing,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncState::Synced => write!(f, "synced"),
            SyncState::DirtyLocal => write!(f, "dirty_local"),
            SyncState::Syncing => write!(f, "syncing"),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the dairy catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4 when created locally).
    pub id: String,

    /// Display name shown on the counter and in reports.
    pub name: String,

    /// Units currently in stock.
    pub stock: i64,

    /// Price per unit.
    pub price: Money,

    /// Unit label, e.g. "packet", "L", "kg".
    pub unit: String,

    /// Free-form category label (see [`CATEGORIES`]).
    #[serde(default)]
    pub category: String,
}

impl Product {
    /// Checks if the product should be flagged as "Low Stock".
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }

    /// Returns the human-readable category name.
    pub fn category_name(&self) -> &str {
        category_display_name(&self.category)
    }
}

/// A product as entered on the add-product form (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub stock: i64,
    pub price: Money,
    pub unit: String,
    #[serde(default)]
    pub category: String,
}

impl NewProduct {
    /// Assigns a fresh id, producing a storable product.
    pub fn into_product(self) -> Product {
        Product {
            id: generate_id(),
            name: self.name,
            stock: self.stock,
            price: self.price,
            unit: self.unit,
            category: self.category,
        }
    }
}

/// Looks up the display name for a sale's product reference.
///
/// Sales keep a weak reference, so a removed product shows as "Unknown".
pub fn product_display_name<'a>(products: &'a [Product], product_id: &str) -> &'a str {
    products
        .iter()
        .find(|p| p.id == product_id)
        .map(|p| p.name.as_str())
        .unwrap_or(UNKNOWN_PRODUCT)
}

/// Filters a product list by category; `None` keeps every product.
pub fn filter_by_category<'a>(products: &'a [Product], category: Option<&str>) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect()
}

// =============================================================================
// Sale Type
// =============================================================================

/// Counter sale (walk-in) or supply sale (bulk delivery).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SaleType {
    Counter,
    Supply,
}

impl Default for SaleType {
    fn default() -> Self {
        SaleType::Counter
    }
}

impl fmt::Display for SaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleType::Counter => write!(f, "counter"),
            SaleType::Supply => write!(f, "supply"),
        }
    }
}

impl std::str::FromStr for SaleType {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "counter" => Ok(SaleType::Counter),
            "supply" => Ok(SaleType::Supply),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: vec!["counter".to_string(), "supply".to_string()],
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Append-only: never edited or deleted once written.
///
/// ## Snapshot Pattern
/// `amount` freezes `quantity × product.price` at the moment of recording.
/// Editing the product price later does not touch existing sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Weak reference to [`Product::id`].
    pub product_id: String,
    pub quantity: i64,
    /// Price × quantity at record time (frozen).
    pub amount: Money,
    #[serde(rename = "type")]
    pub sale_type: SaleType,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

impl Sale {
    /// Records a sale of `quantity` units of `product`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use nayra_core::{Money, Product, Sale, SaleType};
    ///
    /// let milk = Product {
    ///     id: "p1".into(),
    ///     name: "Milk".into(),
    ///     stock: 100,
    ///     price: Money::from_rupees(60),
    ///     unit: "packet".into(),
    ///     category: "milk".into(),
    /// };
    /// let sale = Sale::record(&milk, 4, SaleType::Counter, Utc::now()).unwrap();
    /// assert_eq!(sale.amount, Money::from_rupees(240));
    /// ```
    ///
    /// ## Errors
    /// `ValidationError::TooLarge` when `price × quantity` does not fit.
    pub fn record(
        product: &Product,
        quantity: i64,
        sale_type: SaleType,
        at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let amount = product
            .price
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| ValidationError::TooLarge {
                field: "amount".to_string(),
                max: i64::MAX,
            })?;

        Ok(Sale {
            id: generate_id(),
            product_id: product.id.clone(),
            quantity,
            amount,
            sale_type,
            timestamp: at,
        })
    }

    /// Calendar day (UTC) the sale belongs to.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

// =============================================================================
// Daily Summary
// =============================================================================

/// One product row of a daily summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductLine {
    pub name: String,
    pub quantity: i64,
    pub amount: Money,
}

/// Point-in-time aggregate of one day's sales.
///
/// Identity is the date, but snapshots are appended, not upserted: generating
/// twice in one day stores two summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailySummary {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total_sales: Money,
    pub counter_sales: Money,
    pub supply_sales: Money,
    pub products: Vec<ProductLine>,
}

// =============================================================================
// Backup Envelope
// =============================================================================

/// A snapshot of all three collections, overwritten on every backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BackupEnvelope {
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub summaries: Vec<DailySummary>,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::TimeZone;

    fn milk(price: i64) -> Product {
        Product {
            id: "p1".to_string(),
            name: "Milk".to_string(),
            stock: 100,
            price: Money::from_rupees(price),
            unit: "packet".to_string(),
            category: "milk".to_string(),
        }
    }

    #[test]
    fn test_amount_is_snapshot_of_price() {
        let mut product = milk(60);
        let sale = Sale::record(&product, 4, SaleType::Counter, Utc::now()).unwrap();
        assert_eq!(sale.amount, Money::from_rupees(240));

        product.price = Money::from_rupees(80);
        assert_eq!(sale.amount, Money::from_rupees(240));
    }

    #[test]
    fn test_record_rejects_overflowing_amount() {
        let result = Sale::record(&milk(60), i64::MAX / 100, SaleType::Counter, Utc::now());
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::TooLarge { .. }))
        ));
    }

    #[test]
    fn test_sale_serializes_camel_case_with_type() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let sale = Sale {
            id: "s1".to_string(),
            product_id: "p1".to_string(),
            quantity: 2,
            amount: Money::from_rupees(100),
            sale_type: SaleType::Supply,
            timestamp: ts,
        };

        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["productId"], "p1");
        assert_eq!(json["type"], "supply");
        assert_eq!(json["amount"], 10000);
        assert_eq!(json["timestamp"], "2024-01-01T09:00:00Z");
    }

    #[test]
    fn test_summary_serializes_date_as_day() {
        let summary = DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            total_sales: Money::zero(),
            counter_sales: Money::zero(),
            supply_sales: Money::zero(),
            products: vec![],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert!(json.get("totalSales").is_some());
    }

    #[test]
    fn test_unknown_product_name() {
        let products = vec![milk(60)];
        assert_eq!(product_display_name(&products, "p1"), "Milk");
        assert_eq!(product_display_name(&products, "gone"), UNKNOWN_PRODUCT);
    }

    #[test]
    fn test_low_stock_and_category() {
        let mut product = milk(60);
        assert!(!product.is_low_stock());
        product.stock = 49;
        assert!(product.is_low_stock());

        assert_eq!(product.category_name(), "Milk Products");
        product.category = "paneer".to_string();
        assert_eq!(product.category_name(), "paneer");
    }

    #[test]
    fn test_filter_by_category() {
        let mut curd = milk(50);
        curd.id = "p2".to_string();
        curd.category = "curd".to_string();
        let products = vec![milk(60), curd];

        assert_eq!(filter_by_category(&products, None).len(), 2);
        let only_curd = filter_by_category(&products, Some("curd"));
        assert_eq!(only_curd.len(), 1);
        assert_eq!(only_curd[0].id, "p2");
    }

    #[test]
    fn test_new_product_gets_fresh_id() {
        let new = NewProduct {
            name: "Curd".to_string(),
            stock: 10,
            price: Money::from_rupees(50),
            unit: "kg".to_string(),
            category: "curd".to_string(),
        };
        let a = new.clone().into_product();
        let b = new.into_product();
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Curd");
    }

    #[test]
    fn test_sale_type_parsing() {
        assert_eq!("counter".parse::<SaleType>().unwrap(), SaleType::Counter);
        assert_eq!("Supply".parse::<SaleType>().unwrap(), SaleType::Supply);
        assert!("retail".parse::<SaleType>().is_err());
    }
}

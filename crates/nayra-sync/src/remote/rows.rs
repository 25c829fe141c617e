//! # Remote Rows
//!
//! Snake_case row shapes of the hosted tables, and the mapping to and from
//! the camelCase domain models.
//!
//! ```text
//! ┌───────────────┬──────────────────┬───────────────┬─────────────────────┐
//! │ Model         │ Table            │ Order         │ Delete key          │
//! ├───────────────┼──────────────────┼───────────────┼─────────────────────┤
//! │ Product       │ products         │ name asc      │ id                  │
//! │ Sale          │ sales            │ timestamp desc│ (append-only)       │
//! │ DailySummary  │ daily_summaries  │ date desc     │ date                │
//! └───────────────┴──────────────────┴───────────────┴─────────────────────┘
//! ```
//!
//! The tables hold amounts as rupee numbers (`60`, `48.5`). Rows convert to
//! and from integer paise at this boundary; a fractional paisa read from the
//! server is rounded.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use nayra_core::{DailySummary, Money, Product, ProductLine, Sale, SaleType};
use nayra_db::{CachedEntity, RemovableEntity};

use super::SortBy;

/// Serde adapter: `Money` as a rupee number on the wire.
///
/// Whole amounts are written as integers, everything else as a decimal.
/// Numeric strings are accepted on read, since some PostgREST setups return
/// `numeric` columns as text.
mod rupees {
    use nayra_core::Money;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        if money.paise_part() == 0 {
            serializer.serialize_i64(money.rupees())
        } else {
            serializer.serialize_f64(money.to_rupees_f64())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let money = match Wire::deserialize(deserializer)? {
            Wire::Number(n) => Money::from_rupees_f64(n),
            Wire::Text(text) => Money::parse_rupees(&text),
        };
        money.ok_or_else(|| D::Error::custom("expected a rupee amount"))
    }
}

/// A cached entity that also lives in a remote table.
pub trait SyncRecord: CachedEntity {
    const TABLE: &'static str;
    const ORDER: SortBy;

    type Row: Serialize + DeserializeOwned + Send;

    fn to_row(&self) -> Self::Row;
    fn from_row(row: Self::Row) -> Self;
}

/// A synced entity that can be deleted remotely by one column.
pub trait RemovableRecord: SyncRecord + RemovableEntity {
    const KEY_COLUMN: &'static str;
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub stock: i64,
    #[serde(with = "rupees")]
    pub price: Money,
    pub unit: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl SyncRecord for Product {
    const TABLE: &'static str = "products";
    const ORDER: SortBy = SortBy::asc("name");

    type Row = ProductRow;

    fn to_row(&self) -> ProductRow {
        ProductRow {
            id: self.id.clone(),
            name: self.name.clone(),
            stock: self.stock,
            price: self.price,
            unit: self.unit.clone(),
            category: Some(self.category.clone()),
        }
    }

    fn from_row(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            stock: row.stock,
            price: row.price,
            unit: row.unit,
            category: row.category.unwrap_or_default(),
        }
    }
}

impl RemovableRecord for Product {
    const KEY_COLUMN: &'static str = "id";
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRow {
    pub id: String,
    /// Nullable on the server; a sale may outlive its product.
    pub product_id: Option<String>,
    pub quantity: i64,
    #[serde(with = "rupees")]
    pub amount: Money,
    #[serde(rename = "type")]
    pub sale_type: SaleType,
    pub timestamp: DateTime<Utc>,
}

impl SyncRecord for Sale {
    const TABLE: &'static str = "sales";
    const ORDER: SortBy = SortBy::desc("timestamp");

    type Row = SaleRow;

    fn to_row(&self) -> SaleRow {
        SaleRow {
            id: self.id.clone(),
            product_id: Some(self.product_id.clone()),
            quantity: self.quantity,
            amount: self.amount,
            sale_type: self.sale_type,
            timestamp: self.timestamp,
        }
    }

    fn from_row(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            product_id: row.product_id.unwrap_or_default(),
            quantity: row.quantity,
            amount: row.amount,
            sale_type: row.sale_type,
            timestamp: row.timestamp,
        }
    }
}

// =============================================================================
// Daily Summaries
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub date: NaiveDate,
    #[serde(with = "rupees")]
    pub total_sales: Money,
    #[serde(with = "rupees")]
    pub counter_sales: Money,
    #[serde(with = "rupees")]
    pub supply_sales: Money,
    /// Stored as a JSON column.
    pub products: Vec<ProductLineRow>,
}

/// One entry of the `products` JSON column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLineRow {
    pub name: String,
    pub quantity: i64,
    #[serde(with = "rupees")]
    pub amount: Money,
}

impl From<&ProductLine> for ProductLineRow {
    fn from(line: &ProductLine) -> Self {
        ProductLineRow {
            name: line.name.clone(),
            quantity: line.quantity,
            amount: line.amount,
        }
    }
}

impl From<ProductLineRow> for ProductLine {
    fn from(row: ProductLineRow) -> Self {
        ProductLine {
            name: row.name,
            quantity: row.quantity,
            amount: row.amount,
        }
    }
}

impl SyncRecord for DailySummary {
    const TABLE: &'static str = "daily_summaries";
    const ORDER: SortBy = SortBy::desc("date");

    type Row = SummaryRow;

    fn to_row(&self) -> SummaryRow {
        SummaryRow {
            date: self.date,
            total_sales: self.total_sales,
            counter_sales: self.counter_sales,
            supply_sales: self.supply_sales,
            products: self.products.iter().map(ProductLineRow::from).collect(),
        }
    }

    fn from_row(row: SummaryRow) -> Self {
        DailySummary {
            date: row.date,
            total_sales: row.total_sales,
            counter_sales: row.counter_sales,
            supply_sales: row.supply_sales,
            products: row.products.into_iter().map(ProductLine::from).collect(),
        }
    }
}

impl RemovableRecord for DailySummary {
    const KEY_COLUMN: &'static str = "date";
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_sale_row_is_snake_case() {
        let sale = Sale {
            id: "s1".into(),
            product_id: "p1".into(),
            quantity: 2,
            amount: Money::from_rupees(100),
            sale_type: SaleType::Supply,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
        };
        let value = serde_json::to_value(sale.to_row()).unwrap();
        assert_eq!(value["product_id"], json!("p1"));
        assert_eq!(value["type"], json!("supply"));
        assert!(value.get("productId").is_none());
    }

    #[test]
    fn test_null_product_id_reads_as_orphan() {
        let row: SaleRow = serde_json::from_value(json!({
            "id": "s9",
            "product_id": null,
            "quantity": 1,
            "amount": 50,
            "type": "counter",
            "timestamp": "2024-01-01T10:00:00Z"
        }))
        .unwrap();
        let sale = Sale::from_row(row);
        assert_eq!(sale.product_id, "");
        assert_eq!(sale.amount, Money::from_rupees(50));
    }

    #[test]
    fn test_summary_row_fields() {
        let summary = DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            total_sales: Money::from_rupees(250),
            counter_sales: Money::from_rupees(100),
            supply_sales: Money::from_rupees(150),
            products: vec![ProductLine {
                name: "Milk".into(),
                quantity: 5,
                amount: Money::from_rupees(250),
            }],
        };
        let value = serde_json::to_value(summary.to_row()).unwrap();
        assert_eq!(value["date"], json!("2024-01-01"));
        assert_eq!(value["total_sales"], json!(250));
        assert_eq!(value["counter_sales"], json!(100));
        assert_eq!(value["supply_sales"], json!(150));
        assert_eq!(value["products"][0]["name"], json!("Milk"));
        assert_eq!(value["products"][0]["amount"], json!(250));
    }

    #[test]
    fn test_product_without_category_column() {
        let row: ProductRow = serde_json::from_value(json!({
            "id": "p1", "name": "Curd", "stock": 12, "price": 30, "unit": "cup"
        }))
        .unwrap();
        assert_eq!(Product::from_row(row).category, "");
    }

    #[test]
    fn test_price_is_rupees_on_the_wire() {
        let row: ProductRow = serde_json::from_value(json!({
            "id": "p1", "name": "Milk", "stock": 100, "price": 60.5, "unit": "packet"
        }))
        .unwrap();
        let product = Product::from_row(row);
        assert_eq!(product.price, Money::from_paise(6050));
        assert_eq!(product.price.to_string(), "₹60.50");

        let value = serde_json::to_value(product.to_row()).unwrap();
        assert_eq!(value["price"], json!(60.5));

        let whole = Product {
            price: Money::from_rupees(60),
            ..product
        };
        assert_eq!(serde_json::to_value(whole.to_row()).unwrap()["price"], json!(60));
    }

    #[test]
    fn test_amounts_read_from_numeric_text_and_round() {
        let row: SummaryRow = serde_json::from_value(json!({
            "date": "2024-01-01",
            "total_sales": "250.00",
            "counter_sales": 100.004,
            "supply_sales": 149.996,
            "products": [{"name": "Milk", "quantity": 5, "amount": 250}]
        }))
        .unwrap();
        let summary = DailySummary::from_row(row);
        assert_eq!(summary.total_sales, Money::from_rupees(250));
        assert_eq!(summary.counter_sales, Money::from_rupees(100));
        assert_eq!(summary.supply_sales, Money::from_rupees(150));
        assert_eq!(summary.products[0].amount, Money::from_rupees(250));
    }

    #[test]
    fn test_non_numeric_amount_is_rejected() {
        let row = serde_json::from_value::<ProductRow>(json!({
            "id": "p1", "name": "Milk", "stock": 1, "price": "sixty", "unit": "packet"
        }));
        assert!(row.is_err());
    }
}

//! # Daily Summary Aggregation
//!
//! Builds a [`DailySummary`] snapshot from the sales of one calendar day.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales ──► keep sale.timestamp (UTC) on `date`                         │
//! │                 │                                                       │
//! │                 ├── counter  ──► counter_sales                          │
//! │                 ├── supply   ──► supply_sales                           │
//! │                 └── all      ──► total_sales                            │
//! │                                                                         │
//! │  products (catalog order) ──► one ProductLine each                      │
//! │       quantity = Σ sale.quantity, amount = Σ sale.amount                │
//! │       (rows with zero sales are kept)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales that reference a product no longer in the catalog count toward the
//! totals but produce no product row.

use chrono::NaiveDate;

use crate::money::Money;
use crate::types::{DailySummary, Product, ProductLine, Sale, SaleType};

/// Computes the summary of `date` from `sales` and the current `products`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use nayra_core::summary::summarize;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let summary = summarize(day, &[], &[]);
/// assert!(summary.total_sales.is_zero());
/// ```
pub fn summarize(date: NaiveDate, sales: &[Sale], products: &[Product]) -> DailySummary {
    let day_sales: Vec<&Sale> = sales.iter().filter(|s| s.date() == date).collect();

    let mut counter_sales = Money::zero();
    let mut supply_sales = Money::zero();
    for sale in &day_sales {
        match sale.sale_type {
            SaleType::Counter => counter_sales += sale.amount,
            SaleType::Supply => supply_sales += sale.amount,
        }
    }

    let lines = products
        .iter()
        .map(|product| {
            let (quantity, amount) = day_sales
                .iter()
                .filter(|s| s.product_id == product.id)
                .fold((0i64, Money::zero()), |(qty, amount), s| {
                    (qty + s.quantity, amount + s.amount)
                });
            ProductLine {
                name: product.name.clone(),
                quantity,
                amount,
            }
        })
        .collect();

    DailySummary {
        date,
        total_sales: counter_sales + supply_sales,
        counter_sales,
        supply_sales,
        products: lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn product(id: &str, name: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            stock: 100,
            price: Money::from_rupees(price),
            unit: "packet".to_string(),
            category: "milk".to_string(),
        }
    }

    fn sale(product_id: &str, qty: i64, price: i64, kind: SaleType, day: u32, hour: u32) -> Sale {
        Sale {
            id: format!("{product_id}-{day}-{hour}"),
            product_id: product_id.to_string(),
            quantity: qty,
            amount: Money::from_rupees(qty * price),
            sale_type: kind,
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_milk_day() {
        let products = vec![product("milk", "Milk", 50)];
        let sales = vec![
            sale("milk", 2, 50, SaleType::Counter, 1, 9),
            sale("milk", 3, 50, SaleType::Supply, 1, 15),
        ];

        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let summary = summarize(day, &sales, &products);

        assert_eq!(summary.total_sales, Money::from_rupees(250));
        assert_eq!(summary.counter_sales, Money::from_rupees(100));
        assert_eq!(summary.supply_sales, Money::from_rupees(150));
        assert_eq!(
            summary.products,
            vec![ProductLine {
                name: "Milk".to_string(),
                quantity: 5,
                amount: Money::from_rupees(250),
            }]
        );
    }

    #[test]
    fn test_other_days_are_ignored() {
        let products = vec![product("milk", "Milk", 50)];
        let sales = vec![
            sale("milk", 2, 50, SaleType::Counter, 1, 23),
            sale("milk", 9, 50, SaleType::Counter, 2, 0),
        ];

        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let summary = summarize(day, &sales, &products);
        assert_eq!(summary.total_sales, Money::from_rupees(100));
        assert_eq!(summary.products[0].quantity, 2);
    }

    #[test]
    fn test_zero_rows_and_orphans() {
        let products = vec![product("milk", "Milk", 50), product("curd", "Curd", 40)];
        let sales = vec![
            sale("milk", 1, 50, SaleType::Counter, 1, 9),
            sale("removed", 2, 30, SaleType::Supply, 1, 10),
        ];

        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let summary = summarize(day, &sales, &products);

        assert_eq!(summary.total_sales, Money::from_rupees(110));
        assert_eq!(summary.supply_sales, Money::from_rupees(60));
        assert_eq!(summary.products.len(), 2);
        assert_eq!(summary.products[1].name, "Curd");
        assert_eq!(summary.products[1].quantity, 0);
        assert!(summary.products[1].amount.is_zero());
    }
}

//! # Report Layout
//!
//! The cell layout of the daily sales report, independent of any
//! spreadsheet library. The app writes these rows into a workbook.
//!
//! ```text
//! ┌───────────────┬───────────────┬──────────┐
//! │ Date          │ 2024-01-01    │          │
//! │ Total Sales   │ ₹250.00       │          │
//! │ Counter Sales │ ₹100.00       │          │
//! │ Supply Sales  │ ₹150.00       │          │
//! │               │               │          │
//! │ Product       │ Quantity Sold │ Amount   │
//! │ Milk          │ 5             │ ₹250.00  │
//! └───────────────┴───────────────┴──────────┘
//! ```

use chrono::NaiveDate;

use crate::types::DailySummary;

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Daily Summary";

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Number(i64),
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }
}

/// File name of the exported workbook, e.g. `sales-report-2024-01-01.xlsx`.
pub fn report_file_name(date: NaiveDate) -> String {
    format!("sales-report-{}.xlsx", date.format("%Y-%m-%d"))
}

/// Builds the report rows for `summary`. The blank separator is an empty row.
pub fn report_rows(summary: &DailySummary) -> Vec<Vec<Cell>> {
    let mut rows = vec![
        vec![Cell::text("Date"), Cell::text(summary.date.format("%Y-%m-%d").to_string())],
        vec![Cell::text("Total Sales"), Cell::text(summary.total_sales.to_string())],
        vec![Cell::text("Counter Sales"), Cell::text(summary.counter_sales.to_string())],
        vec![Cell::text("Supply Sales"), Cell::text(summary.supply_sales.to_string())],
        Vec::new(),
        vec![
            Cell::text("Product"),
            Cell::text("Quantity Sold"),
            Cell::text("Amount"),
        ],
    ];

    rows.extend(summary.products.iter().map(|line| {
        vec![
            Cell::text(line.name.clone()),
            Cell::Number(line.quantity),
            Cell::text(line.amount.to_string()),
        ]
    }));

    rows
}

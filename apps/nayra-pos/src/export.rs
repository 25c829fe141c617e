//! # Spreadsheet Export
//!
//! Writes one daily summary as `sales-report-<date>.xlsx` with a single
//! "Daily Summary" sheet. The layout comes from `nayra_core::report`.
//!
//! ```text
//!   A               B                C
//! ┌───────────────┬────────────────┬─────────┐
//! │ Date          │ 2024-01-01     │         │
//! │ Total Sales   │ ₹250.00        │         │
//! │ Counter Sales │ ₹100.00        │         │
//! │ Supply Sales  │ ₹150.00        │         │
//! │               │                │         │
//! │ Product       │ Quantity Sold  │ Amount  │
//! │ Milk          │ 5              │ ₹250.00 │
//! └───────────────┴────────────────┴─────────┘
//! ```

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use tracing::info;

use nayra_core::report::{report_file_name, report_rows, Cell, SHEET_NAME};
use nayra_core::DailySummary;

use crate::error::ApiError;

/// Writes `summary` into `dir` and returns the file path.
pub fn write_summary_workbook(summary: &DailySummary, dir: &Path) -> Result<PathBuf, ApiError> {
    let path = dir.join(report_file_name(summary.date));

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (row, cells) in report_rows(summary).iter().enumerate() {
        let row = row as u32;
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(text) => {
                    sheet.write_string(row, col, text.as_str())?;
                }
                Cell::Number(n) => {
                    sheet.write_number(row, col, *n as f64)?;
                }
            }
        }
    }

    workbook.save(&path)?;
    info!(path = %path.display(), date = %summary.date, "Exported daily summary");
    Ok(path)
}

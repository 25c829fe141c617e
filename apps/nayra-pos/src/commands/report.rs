//! # Report Commands
//!
//! Reports screen (admin): generate a day's summary, list and remove stored
//! summaries, export one as a spreadsheet.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use nayra_core::{DailySummary, ProductLine, Route};
use nayra_sync::Outcome;

use crate::error::ApiError;
use crate::export::write_summary_workbook;
use crate::state::{AppState, SessionContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLineDto {
    pub name: String,
    pub quantity: i64,
    pub amount: String,
}

/// Daily summary with amounts formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub date: NaiveDate,
    pub total_sales: String,
    pub counter_sales: String,
    pub supply_sales: String,
    pub products: Vec<SummaryLineDto>,
}

impl From<ProductLine> for SummaryLineDto {
    fn from(line: ProductLine) -> Self {
        SummaryLineDto {
            name: line.name,
            quantity: line.quantity,
            amount: line.amount.to_string(),
        }
    }
}

impl From<DailySummary> for SummaryDto {
    fn from(s: DailySummary) -> Self {
        SummaryDto {
            date: s.date,
            total_sales: s.total_sales.to_string(),
            counter_sales: s.counter_sales.to_string(),
            supply_sales: s.supply_sales.to_string(),
            products: s.products.into_iter().map(SummaryLineDto::from).collect(),
        }
    }
}

/// Summarizes `date` from the current sales and catalog and stores it.
///
/// Generating the same day twice stores two summaries.
pub async fn generate_summary(
    state: &AppState,
    session: &SessionContext,
    date: NaiveDate,
) -> Result<Outcome<SummaryDto>, ApiError> {
    session.require(Route::Reports)?;
    let generated = state.ctx().summaries().generate(date).await?;
    Ok(generated.map(SummaryDto::from))
}

pub async fn list_summaries(
    state: &AppState,
    session: &SessionContext,
) -> Result<Outcome<Vec<SummaryDto>>, ApiError> {
    session.require(Route::Reports)?;
    let summaries = state.ctx().summaries().get_all().await?;
    Ok(summaries.map(|all| all.into_iter().map(SummaryDto::from).collect()))
}

/// Removes every stored summary of `date`. The value is how many went.
pub async fn remove_summary(
    state: &AppState,
    session: &SessionContext,
    date: NaiveDate,
) -> Result<Outcome<usize>, ApiError> {
    session.require(Route::Reports)?;
    Ok(state.ctx().summaries().remove(date).await?)
}

/// Exports the stored summary of `date` into `dir`.
///
/// With several summaries for the day, the most recently stored one wins.
pub async fn export_summary(
    state: &AppState,
    session: &SessionContext,
    date: NaiveDate,
    dir: &Path,
) -> Result<PathBuf, ApiError> {
    session.require(Route::Reports)?;

    let summaries = state.ctx().summaries().get_all().await?.value;
    let summary = summaries
        .iter()
        .rev()
        .find(|s| s.date == date)
        .ok_or_else(|| ApiError::not_found("Summary", &date.to_string()))?;

    write_summary_workbook(summary, dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{admin, employee, harness};
    use crate::error::ErrorCode;
    use chrono::{TimeZone, Utc};
    use nayra_core::{Money, Product, Sale, SaleType};
    use nayra_sync::SyncOutcome;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    async fn seed_milk_day(state: &AppState) {
        let milk = Product {
            id: "milk".into(),
            name: "Milk".into(),
            stock: 100,
            price: Money::from_rupees(50),
            unit: "packet".into(),
            category: "milk".into(),
        };
        let noon = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        state.ctx().cache().write(&[milk.clone()]).await.unwrap();
        state
            .ctx()
            .cache()
            .write(&[
                Sale::record(&milk, 2, SaleType::Counter, noon).unwrap(),
                Sale::record(&milk, 3, SaleType::Supply, noon).unwrap(),
            ])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_generate_milk_day() {
        let h = harness(false);
        seed_milk_day(&h.state).await;
        let session = admin(&h.state).await;

        let generated = generate_summary(&h.state, &session, day()).await.unwrap();
        assert_eq!(generated.sync, SyncOutcome::Queued);
        assert_eq!(generated.value.total_sales, "₹250.00");
        assert_eq!(generated.value.counter_sales, "₹100.00");
        assert_eq!(generated.value.supply_sales, "₹150.00");
        assert_eq!(
            generated.value.products,
            vec![SummaryLineDto {
                name: "Milk".into(),
                quantity: 5,
                amount: "₹250.00".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_export_and_remove() {
        let h = harness(false);
        seed_milk_day(&h.state).await;
        let session = admin(&h.state).await;
        let dir = tempfile::tempdir().unwrap();

        let err = export_summary(&h.state, &session, day(), dir.path()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        generate_summary(&h.state, &session, day()).await.unwrap();
        generate_summary(&h.state, &session, day()).await.unwrap();
        assert_eq!(list_summaries(&h.state, &session).await.unwrap().value.len(), 2);

        let path = export_summary(&h.state, &session, day(), dir.path()).await.unwrap();
        assert!(path.ends_with("sales-report-2024-01-01.xlsx"));
        assert!(path.exists());

        let removed = remove_summary(&h.state, &session, day()).await.unwrap();
        assert_eq!(removed.value, 2);
        assert!(list_summaries(&h.state, &session).await.unwrap().value.is_empty());
    }

    #[tokio::test]
    async fn test_reports_are_admin_only() {
        let h = harness(false);
        let session = employee(&h.state).await;
        let err = list_summaries(&h.state, &session).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccessDenied);
    }
}

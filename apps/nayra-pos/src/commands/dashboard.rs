//! # Dashboard Command
//!
//! Landing screen: today's takings and products running low.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use nayra_core::{Money, Route, SaleType};
use nayra_sync::SyncOutcome;

use crate::error::ApiError;
use crate::state::{AppState, SessionContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub date: NaiveDate,
    pub sales_count: usize,
    pub total_sales: String,
    pub counter_sales: String,
    pub supply_sales: String,
    pub product_count: usize,
    /// Names of products under the low-stock threshold.
    pub low_stock: Vec<String>,
    pub online: bool,
    /// How fresh the figures are (worst of the two reads).
    pub sync: SyncOutcome,
}

pub async fn dashboard(state: &AppState, session: &SessionContext) -> Result<DashboardDto, ApiError> {
    dashboard_for(state, session, Utc::now().date_naive()).await
}

pub async fn dashboard_for(
    state: &AppState,
    session: &SessionContext,
    date: NaiveDate,
) -> Result<DashboardDto, ApiError> {
    session.require(Route::Dashboard)?;

    let products = state.ctx().products().get_all().await?;
    let sales = state.ctx().sales().get_all().await?;

    let today: Vec<_> = sales.value.iter().filter(|s| s.date() == date).collect();
    let (counter, supply) = today.iter().fold(
        (Money::zero(), Money::zero()),
        |(counter, supply), s| match s.sale_type {
            SaleType::Counter => (counter + s.amount, supply),
            SaleType::Supply => (counter, supply + s.amount),
        },
    );

    let low_stock = products
        .value
        .iter()
        .filter(|p| p.is_low_stock())
        .map(|p| p.name.clone())
        .collect();

    let sync = if products.sync.is_synced() { sales.sync } else { products.sync };

    Ok(DashboardDto {
        date,
        sales_count: today.len(),
        total_sales: (counter + supply).to_string(),
        counter_sales: counter.to_string(),
        supply_sales: supply.to_string(),
        product_count: products.value.len(),
        low_stock,
        online: state.ctx().is_online(),
        sync,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{admin, employee, harness};
    use crate::commands::product::{add_product, ProductForm};
    use crate::commands::sale::{record_sale, SaleForm};

    fn form(name: &str, stock: i64) -> ProductForm {
        ProductForm {
            name: name.into(),
            stock,
            price: "20".into(),
            unit: "cup".into(),
            category: "ice-cream".into(),
        }
    }

    #[tokio::test]
    async fn test_today_totals_and_low_stock() {
        let h = harness(false);
        let owner = admin(&h.state).await;
        let cone = add_product(&h.state, &owner, form("Cone", 10)).await.unwrap().value;
        add_product(&h.state, &owner, form("Cup", 200)).await.unwrap();

        let session = employee(&h.state).await;
        for (quantity, sale_type) in [(2, SaleType::Counter), (5, SaleType::Supply)] {
            let sale = SaleForm {
                product_id: cone.id.clone(),
                quantity,
                sale_type,
            };
            record_sale(&h.state, &session, sale).await.unwrap();
        }

        let board = dashboard(&h.state, &session).await.unwrap();
        assert_eq!(board.sales_count, 2);
        assert_eq!(board.counter_sales, "₹40.00");
        assert_eq!(board.supply_sales, "₹100.00");
        assert_eq!(board.total_sales, "₹140.00");
        assert_eq!(board.product_count, 2);
        assert_eq!(board.low_stock, vec!["Cone".to_string()]);
        assert!(!board.online);
        assert_eq!(board.sync, SyncOutcome::Offline);
    }
}

//! # Sale Commands
//!
//! Sales screen: record a counter or supply sale, list the ledger.
//!
//! Recording freezes `quantity × price` into the sale; stock is not touched
//! (the inventory screen adjusts stock by hand).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use nayra_core::types::product_display_name;
use nayra_core::validation::{validate_product_selection, validate_quantity};
use nayra_core::{CoreError, Product, Route, Sale, SaleType};
use nayra_sync::Outcome;

use crate::error::ApiError;
use crate::state::{AppState, SessionContext};

/// Sale as shown in the ledger, with the product name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub product_id: String,
    /// "Unknown" once the product has been removed.
    pub product_name: String,
    pub quantity: i64,
    pub amount: String,
    #[serde(rename = "type")]
    pub sale_type: SaleType,
    pub timestamp: DateTime<Utc>,
}

impl SaleDto {
    fn new(sale: Sale, products: &[Product]) -> Self {
        SaleDto {
            product_name: product_display_name(products, &sale.product_id).to_string(),
            amount: sale.amount.to_string(),
            id: sale.id,
            product_id: sale.product_id,
            quantity: sale.quantity,
            sale_type: sale.sale_type,
            timestamp: sale.timestamp,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SaleForm {
    pub product_id: String,
    pub quantity: i64,
    pub sale_type: SaleType,
}

pub async fn record_sale(
    state: &AppState,
    session: &SessionContext,
    form: SaleForm,
) -> Result<Outcome<SaleDto>, ApiError> {
    session.require(Route::Sales)?;

    let product_id = form.product_id.trim();
    validate_product_selection(product_id)?;
    validate_quantity(form.quantity)?;

    let products = state.ctx().products().get_all().await?.value;
    let product = products
        .iter()
        .find(|p| p.id == product_id)
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    let recorded = state
        .ctx()
        .sales()
        .record(product, form.quantity, form.sale_type)
        .await?;
    Ok(recorded.map(|sale| SaleDto::new(sale, &products)))
}

/// Lists sales, newest first, optionally only those of one day.
pub async fn list_sales(
    state: &AppState,
    session: &SessionContext,
    date: Option<NaiveDate>,
) -> Result<Outcome<Vec<SaleDto>>, ApiError> {
    session.require(Route::Sales)?;

    let products = state.ctx().products().get_all().await?.value;
    let sales = state.ctx().sales().get_all().await?;

    Ok(sales.map(|mut sales| {
        sales.retain(|s| date.map_or(true, |d| s.date() == d));
        sales.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sales
            .into_iter()
            .map(|sale| SaleDto::new(sale, &products))
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{admin, employee, harness};
    use crate::commands::product::{add_product, remove_product, update_product, ProductForm};
    use crate::error::ErrorCode;
    use nayra_sync::SyncOutcome;

    async fn add_milk(h: &crate::commands::fixtures::Harness) -> String {
        let session = admin(&h.state).await;
        let form = ProductForm {
            name: "Milk".into(),
            stock: 100,
            price: "60".into(),
            unit: "packet".into(),
            category: "milk".into(),
        };
        add_product(&h.state, &session, form).await.unwrap().value.id
    }

    fn sale(product_id: &str, quantity: i64) -> SaleForm {
        SaleForm {
            product_id: product_id.into(),
            quantity,
            sale_type: SaleType::Counter,
        }
    }

    #[tokio::test]
    async fn test_amount_frozen_after_price_edit() {
        let h = harness(false);
        let milk = add_milk(&h).await;
        let session = employee(&h.state).await;

        let recorded = record_sale(&h.state, &session, sale(&milk, 4)).await.unwrap();
        assert_eq!(recorded.value.amount, "₹240.00");
        assert_eq!(recorded.sync, SyncOutcome::Queued);

        let owner = admin(&h.state).await;
        update_product(&h.state, &owner, &milk, "price", "80").await.unwrap();

        let listed = list_sales(&h.state, &session, None).await.unwrap();
        assert_eq!(listed.value.len(), 1);
        assert_eq!(listed.value[0].amount, "₹240.00");
        assert_eq!(listed.value[0].product_name, "Milk");
    }

    #[tokio::test]
    async fn test_removed_product_shows_unknown() {
        let h = harness(false);
        let milk = add_milk(&h).await;
        let session = admin(&h.state).await;
        record_sale(&h.state, &session, sale(&milk, 1)).await.unwrap();
        remove_product(&h.state, &session, &milk).await.unwrap();

        let listed = list_sales(&h.state, &session, None).await.unwrap();
        assert_eq!(listed.value[0].product_name, "Unknown");
    }

    #[tokio::test]
    async fn test_form_validation() {
        let h = harness(false);
        let milk = add_milk(&h).await;
        let session = employee(&h.state).await;

        let err = record_sale(&h.state, &session, sale("", 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = record_sale(&h.state, &session, sale(&milk, 0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = record_sale(&h.state, &session, sale(&milk, i64::MAX / 100)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = record_sale(&h.state, &session, sale("missing", 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        assert!(list_sales(&h.state, &session, None).await.unwrap().value.is_empty());
    }

    #[tokio::test]
    async fn test_filter_by_day() {
        let h = harness(false);
        let milk = add_milk(&h).await;
        let session = employee(&h.state).await;
        record_sale(&h.state, &session, sale(&milk, 2)).await.unwrap();

        let today = Utc::now().date_naive();
        let yesterday = today.pred_opt().unwrap();
        assert_eq!(list_sales(&h.state, &session, Some(today)).await.unwrap().value.len(), 1);
        assert!(list_sales(&h.state, &session, Some(yesterday)).await.unwrap().value.is_empty());
    }
}

//! # Product Commands
//!
//! Inventory screen: list, add, remove and edit products.
//!
//! ## Add Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductForm { name, stock, price: "48.50", unit, category }            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_price ──► NewProduct ──► validate_new_product                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductManager::add ──► cache always, remote when online               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Outcome<ProductDto> { value, sync }                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use nayra_core::types::filter_by_category;
use nayra_core::validation::{parse_price, validate_new_product};
use nayra_core::{NewProduct, Product, ProductUpdate, Route};
use nayra_sync::Outcome;

use crate::error::ApiError;
use crate::state::{AppState, SessionContext};

/// Product as shown on the inventory and sales screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub stock: i64,
    /// Formatted price, e.g. "₹60.00".
    pub price: String,
    pub unit: String,
    pub category: String,
    pub low_stock: bool,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            low_stock: p.is_low_stock(),
            category: p.category_name().to_string(),
            price: p.price.to_string(),
            id: p.id,
            name: p.name,
            stock: p.stock,
            unit: p.unit,
        }
    }
}

/// Raw add-product form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub stock: i64,
    pub price: String,
    pub unit: String,
    pub category: String,
}

impl ProductForm {
    fn into_new_product(self) -> Result<NewProduct, ApiError> {
        let product = NewProduct {
            name: self.name.trim().to_string(),
            stock: self.stock,
            price: parse_price(&self.price)?,
            unit: self.unit.trim().to_string(),
            category: self.category.trim().to_string(),
        };
        validate_new_product(&product)?;
        Ok(product)
    }
}

/// Lists products, optionally restricted to one category id.
///
/// Any logged-in operator may list: the sales screen picks from it.
pub async fn list_products(
    state: &AppState,
    session: &SessionContext,
    category: Option<&str>,
) -> Result<Outcome<Vec<ProductDto>>, ApiError> {
    session.require(Route::Sales)?;

    let all = state.ctx().products().get_all().await?;
    Ok(all.map(|products| {
        let shown: Vec<ProductDto> = filter_by_category(&products, category)
            .into_iter()
            .cloned()
            .map(ProductDto::from)
            .collect();
        debug!(total = products.len(), shown = shown.len(), ?category, "Listed products");
        shown
    }))
}

pub async fn add_product(
    state: &AppState,
    session: &SessionContext,
    form: ProductForm,
) -> Result<Outcome<ProductDto>, ApiError> {
    session.require(Route::Inventory)?;

    let new = form.into_new_product()?;
    let added = state.ctx().products().add(new).await?;
    Ok(added.map(ProductDto::from))
}

/// Removes a product. The value is whether it was in the catalog.
pub async fn remove_product(
    state: &AppState,
    session: &SessionContext,
    id: &str,
) -> Result<Outcome<bool>, ApiError> {
    session.require(Route::Inventory)?;
    Ok(state.ctx().products().remove(id.trim()).await?)
}

/// Edits one field of one product, e.g. `("price", "80")`.
pub async fn update_product(
    state: &AppState,
    session: &SessionContext,
    id: &str,
    field: &str,
    value: &str,
) -> Result<Outcome<ProductDto>, ApiError> {
    session.require(Route::Inventory)?;

    let id = id.trim().to_string();
    let update = ProductUpdate::parse(field, value)?;
    let saved = state
        .ctx()
        .products()
        .apply_updates(&[(id.clone(), update)])
        .await?;

    let product = saved
        .value
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Product", &id))?;
    Ok(Outcome::new(ProductDto::from(product), saved.sync))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{admin, employee, harness};
    use crate::error::ErrorCode;
    use nayra_sync::SyncOutcome;

    fn form(name: &str, price: &str, category: &str) -> ProductForm {
        ProductForm {
            name: name.into(),
            stock: 20,
            price: price.into(),
            unit: "packet".into(),
            category: category.into(),
        }
    }

    #[tokio::test]
    async fn test_add_and_list_by_category() {
        let h = harness(false);
        let session = admin(&h.state).await;

        let milk = add_product(&h.state, &session, form("Milk", "60", "milk")).await.unwrap();
        assert_eq!(milk.sync, SyncOutcome::Offline);
        assert_eq!(milk.value.price, "₹60.00");
        assert_eq!(milk.value.category, "Milk Products");
        assert!(milk.value.low_stock);

        add_product(&h.state, &session, form("Curd", "30.5", "curd")).await.unwrap();

        let all = list_products(&h.state, &session, None).await.unwrap();
        assert_eq!(all.value.len(), 2);
        let curd = list_products(&h.state, &session, Some("curd")).await.unwrap();
        assert_eq!(curd.value.len(), 1);
        assert_eq!(curd.value[0].price, "₹30.50");
        assert_eq!(h.remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_form() {
        let h = harness(false);
        let session = admin(&h.state).await;

        let err = add_product(&h.state, &session, form("", "60", "milk")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_product(&h.state, &session, form("Milk", "abc", "milk")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let listed = list_products(&h.state, &session, None).await.unwrap();
        assert!(listed.value.is_empty());
    }

    #[tokio::test]
    async fn test_employee_cannot_edit_inventory() {
        let h = harness(false);
        let session = employee(&h.state).await;

        let err = add_product(&h.state, &session, form("Milk", "60", "milk")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccessDenied);
        assert!(list_products(&h.state, &session, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_price_and_remove() {
        let h = harness(true);
        let session = admin(&h.state).await;
        let milk = add_product(&h.state, &session, form("Milk", "60", "milk")).await.unwrap();
        assert_eq!(milk.sync, SyncOutcome::Synced);

        let edited = update_product(&h.state, &session, &milk.value.id, "price", "80")
            .await
            .unwrap();
        assert_eq!(edited.value.price, "₹80.00");
        assert_eq!(edited.sync, SyncOutcome::Synced);

        let err = update_product(&h.state, &session, "missing", "stock", "5")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let removed = remove_product(&h.state, &session, &milk.value.id).await.unwrap();
        assert!(removed.value);
        assert!(h.remote.rows("products").await.is_empty());
    }
}

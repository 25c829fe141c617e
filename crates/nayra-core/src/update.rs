//! # Product Updates
//!
//! Typed field edits made from the inventory screen.
//!
//! ```text
//! "stock" "80"     ──► ProductUpdate::Stock(80)
//! "price" "48.50"  ──► ProductUpdate::Price(₹48.50)
//! "colour" "red"   ──► ValidationError::NotAllowed
//! ```
//!
//! Every update is validated before it touches the product, so a rejected
//! edit leaves the product unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{
    parse_price, validate_price, validate_product_name, validate_stock, validate_unit,
    ValidationResult,
};

/// Field names accepted by [`ProductUpdate::parse`].
pub const EDITABLE_FIELDS: [&str; 5] = ["stock", "price", "name", "unit", "category"];

/// A single edit of one product field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum ProductUpdate {
    Stock(i64),
    Price(Money),
    Name(String),
    Unit(String),
    Category(String),
}

impl ProductUpdate {
    /// Builds an update from a field name and the text the operator typed.
    pub fn parse(field: &str, value: &str) -> ValidationResult<Self> {
        match field.trim().to_lowercase().as_str() {
            "stock" => value
                .trim()
                .parse::<i64>()
                .map(ProductUpdate::Stock)
                .map_err(|e| ValidationError::InvalidFormat {
                    field: "stock".to_string(),
                    reason: e.to_string(),
                }),
            "price" => parse_price(value).map(ProductUpdate::Price),
            "name" => Ok(ProductUpdate::Name(value.trim().to_string())),
            "unit" => Ok(ProductUpdate::Unit(value.trim().to_string())),
            "category" => Ok(ProductUpdate::Category(value.trim().to_string())),
            _ => Err(ValidationError::NotAllowed {
                field: "field".to_string(),
                allowed: EDITABLE_FIELDS.iter().map(|f| f.to_string()).collect(),
            }),
        }
    }

    /// Checks the new value without applying it.
    pub fn validate(&self) -> ValidationResult<()> {
        match self {
            ProductUpdate::Stock(stock) => validate_stock(*stock),
            ProductUpdate::Price(price) => validate_price(*price),
            ProductUpdate::Name(name) => validate_product_name(name),
            ProductUpdate::Unit(unit) => validate_unit(unit),
            ProductUpdate::Category(_) => Ok(()),
        }
    }

    /// Validates and applies the edit to `product`.
    pub fn apply(&self, product: &mut Product) -> ValidationResult<()> {
        self.validate()?;
        match self {
            ProductUpdate::Stock(stock) => product.stock = *stock,
            ProductUpdate::Price(price) => product.price = *price,
            ProductUpdate::Name(name) => product.name = name.trim().to_string(),
            ProductUpdate::Unit(unit) => product.unit = unit.trim().to_string(),
            ProductUpdate::Category(category) => product.category = category.clone(),
        }
        Ok(())
    }
}

/// Applies a batch of `(product id, update)` edits to a product list.
///
/// Either every edit applies or none does: all updates are validated and all
/// ids resolved before the list is touched.
pub fn apply_updates(products: &mut [Product], updates: &[(String, ProductUpdate)]) -> CoreResult<()> {
    for (id, update) in updates {
        if !products.iter().any(|p| &p.id == id) {
            return Err(CoreError::ProductNotFound(id.clone()));
        }
        update.validate()?;
    }

    for (id, update) in updates {
        if let Some(product) = products.iter_mut().find(|p| &p.id == id) {
            update.apply(product)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milk() -> Product {
        Product {
            id: "p1".to_string(),
            name: "Milk".to_string(),
            stock: 100,
            price: Money::from_rupees(60),
            unit: "packet".to_string(),
            category: "milk".to_string(),
        }
    }

    #[test]
    fn test_parse_fields() {
        assert_eq!(ProductUpdate::parse("stock", "80").unwrap(), ProductUpdate::Stock(80));
        assert_eq!(
            ProductUpdate::parse("Price", "48.50").unwrap(),
            ProductUpdate::Price(Money::from_paise(4850))
        );
        assert!(ProductUpdate::parse("stock", "lots").is_err());
        assert!(matches!(
            ProductUpdate::parse("colour", "red"),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_apply_rejects_invalid_value() {
        let mut product = milk();
        assert!(ProductUpdate::Stock(-5).apply(&mut product).is_err());
        assert_eq!(product.stock, 100);

        ProductUpdate::Price(Money::from_rupees(80)).apply(&mut product).unwrap();
        assert_eq!(product.price, Money::from_rupees(80));
    }

    #[test]
    fn test_apply_updates_is_all_or_nothing() {
        let mut products = vec![milk()];
        let updates = vec![
            ("p1".to_string(), ProductUpdate::Stock(10)),
            ("missing".to_string(), ProductUpdate::Stock(10)),
        ];
        assert!(matches!(
            apply_updates(&mut products, &updates),
            Err(CoreError::ProductNotFound(_))
        ));
        assert_eq!(products[0].stock, 100);

        let updates = vec![
            ("p1".to_string(), ProductUpdate::Stock(10)),
            ("p1".to_string(), ProductUpdate::Name("Full Cream Milk".to_string())),
        ];
        apply_updates(&mut products, &updates).unwrap();
        assert_eq!(products[0].stock, 10);
        assert_eq!(products[0].name, "Full Cream Milk");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(ProductUpdate::Stock(5)).unwrap();
        assert_eq!(json["field"], "stock");
        assert_eq!(json["value"], 5);
    }
}

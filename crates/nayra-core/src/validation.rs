//! # Validation Module
//!
//! Input validation for the add-product and record-sale forms.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Command arguments (clap)                                     │
//! │  └── Type validation (integers, sale type)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields (name, unit, product)                             │
//! │  └── Range rules (price/stock not negative, quantity positive)         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Collection managers                                          │
//! │  └── No checks: managers persist what they are given                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nayra_core::validation::{validate_product_name, validate_quantity};
//!
//! validate_product_name("Toned Milk 500ml").unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::NewProduct;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest quantity one sale may record.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Longest accepted product name.
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted unit label.
pub const MAX_UNIT_LEN: usize = 20;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a unit label ("packet", "L", "kg", ...).
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    let unit = unit.trim();

    if unit.is_empty() {
        return Err(ValidationError::Required {
            field: "unit".to_string(),
        });
    }

    if unit.chars().count() > MAX_UNIT_LEN {
        return Err(ValidationError::TooLong {
            field: "unit".to_string(),
            max: MAX_UNIT_LEN,
        });
    }

    Ok(())
}

/// Validates the product selected on the record-sale form.
pub fn validate_product_selection(product_id: &str) -> ValidationResult<()> {
    if product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - At most [`MAX_QUANTITY`]
///
/// ```text
/// quantity: 5          ──► OK
/// quantity: 0          ──► "quantity must be positive" (form refuses to submit)
/// quantity: 2_000_000  ──► "quantity must be at most 1000000"
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if qty > MAX_QUANTITY {
        return Err(ValidationError::TooLarge {
            field: "quantity".to_string(),
            max: MAX_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a unit price. Zero is allowed.
///
/// ## Example
/// ```rust
/// use nayra_core::money::Money;
/// use nayra_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_rupees(60)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_rupees(-1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level. Zero is allowed.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates every field of the add-product form, reporting the first failure.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_unit(&product.unit)?;
    validate_price(product.price)?;
    validate_stock(product.stock)?;
    Ok(())
}

/// Parses a rupee amount typed by the operator.
pub fn parse_price(input: &str) -> ValidationResult<Money> {
    if input.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "price".to_string(),
        });
    }

    let price = Money::parse_rupees(input).ok_or_else(|| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: "expected a rupee amount such as 60 or 48.50".to_string(),
    })?;

    validate_price(price)?;
    Ok(price)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewProduct {
        NewProduct {
            name: "Toned Milk".to_string(),
            stock: 120,
            price: Money::from_rupees(27),
            unit: "packet".to_string(),
            category: "milk".to_string(),
        }
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Curd 1kg").is_ok());
        assert_eq!(
            validate_product_name("   "),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert_eq!(
            validate_quantity(i64::MAX / 100),
            Err(ValidationError::TooLarge {
                field: "quantity".to_string(),
                max: MAX_QUANTITY,
            })
        );
    }

    #[test]
    fn test_validate_new_product() {
        assert!(validate_new_product(&form()).is_ok());

        let mut missing_unit = form();
        missing_unit.unit = String::new();
        assert_eq!(
            validate_new_product(&missing_unit),
            Err(ValidationError::Required {
                field: "unit".to_string()
            })
        );

        let mut negative_stock = form();
        negative_stock.stock = -1;
        assert!(validate_new_product(&negative_stock).is_err());

        let mut free = form();
        free.price = Money::zero();
        assert!(validate_new_product(&free).is_ok());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("48.50"), Ok(Money::from_paise(4850)));
        assert!(matches!(parse_price(""), Err(ValidationError::Required { .. })));
        assert!(matches!(
            parse_price("abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_price("-5"),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
    }

    #[test]
    fn test_validate_product_selection() {
        assert!(validate_product_selection("p1").is_ok());
        assert!(validate_product_selection("").is_err());
    }
}

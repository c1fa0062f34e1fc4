//! # Validation Module
//!
//! Input validation for catalog, basket and tax operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request decoding (terminal)                                  │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service entry (Rust)                                         │
//! │  └── THIS MODULE: field rules, before any store is touched             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints (quantity >= 0, price > 0)                      │
//! │  ├── UNIQUE constraints (product name, one basket line per product)    │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_product_name, validate_quantity};
//!
//! assert_eq!(validate_product_name("  Widget ").unwrap(), "Widget");
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Percentage, TaxRate};
use crate::{MAX_MARGIN_BPS, MAX_PRODUCT_NAME_LEN, MAX_QUANTITY, MAX_UNIT_AMOUNT_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_PRODUCT_NAME_LEN`] characters
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a restock or basket quantity.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Basket: Add Item                                                       │
/// │                                                                         │
/// │  Cashier enters quantity: 3                                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(3) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > MAX_QUANTITY? → Error: out of range                     │
/// │       │                                                                 │
/// │       └── OK → stock check against the catalog                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a sale price. Zero is not a price.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    ensure_unit_amount("price", price)
}

/// Validates a unit cost, given directly or after deriving it from a margin.
pub fn validate_cost(cost: Money) -> ValidationResult<()> {
    if !cost.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "cost".to_string(),
        });
    }

    ensure_unit_amount("cost", cost)
}

fn ensure_unit_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.cents() > MAX_UNIT_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_UNIT_AMOUNT_CENTS,
        });
    }

    Ok(())
}

/// Validates a restock margin.
pub fn validate_margin(margin: Percentage) -> ValidationResult<()> {
    if margin.bps() > MAX_MARGIN_BPS {
        return Err(ValidationError::OutOfRange {
            field: "margin".to_string(),
            min: 0,
            max: (MAX_MARGIN_BPS / 100) as i64,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.bps() > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Converts a decimal percentage (`19.0`, `8.25`) to basis points.
///
/// Rejects NaN, infinities and negative values. Range limits specific to
/// the field are checked by the caller.
///
/// ```rust
/// use stockroom_core::validation::percentage_from_decimal;
///
/// assert_eq!(percentage_from_decimal("tax_rate", 19.0).unwrap().bps(), 1900);
/// assert!(percentage_from_decimal("margin", -5.0).is_err());
/// assert!(percentage_from_decimal("margin", f64::NAN).is_err());
/// ```
pub fn percentage_from_decimal(field: &str, value: f64) -> ValidationResult<Percentage> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    // Anything past u32 bps is out of every range we accept
    if value * 100.0 > u32::MAX as f64 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: (u32::MAX / 100) as i64,
        });
    }

    Ok(Percentage::from_percentage(value))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert_eq!(validate_product_name("Widget").unwrap(), "Widget");
        assert_eq!(validate_product_name("  Widget  ").unwrap(), "Widget");
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(MAX_PRODUCT_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());

        assert!(validate_quantity(MAX_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(matches!(
            validate_quantity(MAX_QUANTITY + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_quantity(i64::MAX / 2).is_err());
    }

    #[test]
    fn test_validate_price_and_cost() {
        assert!(validate_price(Money::from_cents(1)).is_ok());
        assert!(validate_price(Money::zero()).is_err());
        assert!(validate_price(Money::from_cents(-100)).is_err());

        assert!(validate_cost(Money::from_cents(200)).is_ok());
        assert!(validate_cost(Money::zero()).is_err());

        let ceiling = Money::from_cents(MAX_UNIT_AMOUNT_CENTS);
        assert!(validate_price(ceiling).is_ok());
        assert!(matches!(
            validate_price(Money::from_cents(MAX_UNIT_AMOUNT_CENTS + 1)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_cost(Money::from_cents(i64::MAX)).is_err());
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate(TaxRate::from_bps(0)).is_ok());
        assert!(validate_tax_rate(TaxRate::from_bps(1900)).is_ok());
        assert!(validate_tax_rate(TaxRate::from_bps(10_000)).is_ok());
        assert!(validate_tax_rate(TaxRate::from_bps(10_001)).is_err());
    }

    #[test]
    fn test_validate_margin() {
        assert!(validate_margin(Percentage::zero()).is_ok());
        assert!(validate_margin(Percentage::from_bps(MAX_MARGIN_BPS)).is_ok());
        assert!(validate_margin(Percentage::from_bps(MAX_MARGIN_BPS + 1)).is_err());
    }

    #[test]
    fn test_percentage_from_decimal() {
        assert_eq!(percentage_from_decimal("margin", 25.0).unwrap().bps(), 2500);
        assert_eq!(percentage_from_decimal("tax_rate", 0.0).unwrap().bps(), 0);
        assert!(matches!(
            percentage_from_decimal("tax_rate", -0.5),
            Err(ValidationError::Negative { .. })
        ));
        assert!(percentage_from_decimal("tax_rate", f64::INFINITY).is_err());
        assert!(percentage_from_decimal("margin", 1e12).is_err());
    }
}

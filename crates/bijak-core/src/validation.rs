//! # Validation Module
//!
//! Input validation for line-item entry.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Item form submits (name, price, quantity, unit)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  THIS MODULE: trim, range-check, normalize                              │
//! │       │                                                                 │
//! │       ├── any failure → ValidationError, draft UNCHANGED                │
//! │       │                                                                 │
//! │       └── ok → session appends/replaces the LineItem snapshot           │
//! │                                                                         │
//! │  Validation happens BEFORE any mutation, so a rejected submit can       │
//! │  never corrupt totals or lose items.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_NAME_LEN, MAX_UNIT_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item/product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
///
/// Returns the trimmed name.
///
/// ## Example
/// ```rust
/// use bijak_core::validation::validate_item_name;
///
/// assert_eq!(validate_item_name("  Paneer ").unwrap(), "Paneer");
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name",
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates and normalizes a unit label.
///
/// ## Rules
/// - May be empty (a bare count needs no unit)
/// - At most 30 characters
/// - Lower-cased, so "Kg" and "kg" are the same unit everywhere
pub fn validate_unit_label(unit: &str) -> ValidationResult<String> {
    let unit = unit.trim();

    if unit.chars().count() > MAX_UNIT_LEN {
        return Err(ValidationError::TooLong {
            field: "unit",
            max: MAX_UNIT_LEN,
        });
    }

    Ok(unit.to_lowercase())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price and converts it to cents.
///
/// ## Rules
/// - Must be a finite number (NaN/infinity rejected)
/// - Must be non-negative; zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use bijak_core::validation::validate_unit_price;
///
/// assert_eq!(validate_unit_price(10.99).unwrap(), 1099);
/// assert_eq!(validate_unit_price(0.0).unwrap(), 0);
/// assert!(validate_unit_price(-5.0).is_err());
/// assert!(validate_unit_price(f64::NAN).is_err());
/// ```
pub fn validate_unit_price(price: f64) -> ValidationResult<i64> {
    if !price.is_finite() {
        return Err(ValidationError::NotANumber { field: "price" });
    }

    if price < 0.0 {
        return Err(ValidationError::Negative { field: "price" });
    }

    Ok(Money::from_decimal(price).cents())
}

/// Validates a quantity.
///
/// ## Rules
/// - Must be a finite number
/// - Must be strictly positive (0.5 is fine, 0 is not)
pub fn validate_quantity(qty: f64) -> ValidationResult<f64> {
    if !qty.is_finite() {
        return Err(ValidationError::NotANumber { field: "quantity" });
    }

    if qty <= 0.0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }

    Ok(qty)
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Validation Module
//!
//! Input validation utilities for Almacen POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (almacen-api)                                   │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── Decimal → cents / basis points conversion                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (business rule validation)                       │
//! │  ├── Runs before any unit of work is opened                            │
//! │  └── Shape of the sale request, names, SKUs, quantities                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock_on_hand >= 0)                                        │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use almacen_core::validation::{validate_quantity, validate_sku};
//! use almacen_core::Quantity;
//!
//! validate_sku("YER-1KG").unwrap();
//! validate_quantity(Quantity::from_milli(1500)).unwrap();
//! ```

use crate::error::ValidationError;
use crate::quantity::Quantity;
use crate::types::SaleLineRequest;
use crate::MAX_SALE_LINES;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use almacen_core::validation::validate_sku;
///
/// assert!(validate_sku("YER-1KG").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a required free-text field (1..=`max` characters after trim).
fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name (required, at most 200 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 200)
}

/// Validates a supplier trade name (required, at most 200 characters).
pub fn validate_trade_name(name: &str) -> ValidationResult<()> {
    validate_text("trade_name", name, 200)
}

/// Validates a category name (required, at most 100 characters).
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 100)
}

/// Validates a unit of measure such as "unit", "kg" or "pack".
pub fn validate_unit_of_measure(unit: &str) -> ValidationResult<()> {
    validate_text("unit_of_measure", unit, 20)
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (lists products)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "q".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Folds text for case-insensitive matching.
///
/// Uses Unicode lowercasing, so `"Ñandú"`, `"ñandú"` and `"ÑANDÚ"` share a
/// key. Product names and SKUs are stored with their key next to them, and
/// search queries are folded the same way before matching.
///
/// ## Example
/// ```rust
/// use almacen_core::validation::search_key;
///
/// assert_eq!(search_key("Ñandú Ácido"), search_key("ñANDÚ áCIDO"));
/// ```
pub fn search_key(text: &str) -> String {
    text.trim().to_lowercase()
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## Rules
/// - Must be positive (> 0); fractions such as 0.25 kg are allowed
pub fn validate_quantity(qty: Quantity) -> ValidationResult<()> {
    validate_quantity_field("quantity", qty)
}

fn validate_quantity_field(field: &str, qty: Quantity) -> ValidationResult<()> {
    if !qty.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level (initial or minimum stock).
pub fn validate_stock_level(field: &str, qty: Quantity) -> ValidationResult<()> {
    if qty.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a cost in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free samples)
pub fn validate_cost_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "cost".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a margin in basis points: at least -100%.
pub fn validate_margin_bps(bps: i64) -> ValidationResult<()> {
    if bps < -10_000 {
        return Err(ValidationError::OutOfRange {
            field: "margin".to_string(),
            min: -100,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the shape of a sale request before any stock is touched.
///
/// ## Rules
/// - At least one line, at most MAX_SALE_LINES (100)
/// - Every line names a product
/// - Every quantity is positive
///
/// Field names point at the offending line (`items[2].quantity`).
///
/// ## Example
/// ```rust
/// use almacen_core::types::SaleLineRequest;
/// use almacen_core::validation::validate_sale_lines;
///
/// assert!(validate_sale_lines(&[SaleLineRequest::new("p1", 2)]).is_ok());
/// assert!(validate_sale_lines(&[]).is_err());
/// assert!(validate_sale_lines(&[SaleLineRequest::new("p1", 0)]).is_err());
/// ```
pub fn validate_sale_lines(items: &[SaleLineRequest]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    if items.len() > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SALE_LINES as i64,
        });
    }

    for (i, item) in items.iter().enumerate() {
        if item.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: format!("items[{i}].product_id"),
            });
        }
        validate_quantity_field(&format!("items[{i}].quantity"), item.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

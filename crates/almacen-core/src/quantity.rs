//! # Quantity Module
//!
//! Stock levels and sold amounts, measured in the product's unit of measure.
//!
//! ## Representation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Quantity = i64 thousandths of the unit of measure                      │
//! │                                                                         │
//! │    3 units      → 3000                                                  │
//! │    1.5 kg       → 1500                                                  │
//! │    0.125 m      →  125                                                  │
//! │                                                                         │
//! │  Like Money, the decimal the client sent is converted ONCE at the       │
//! │  boundary; stock arithmetic in SQL stays exact integer arithmetic.     │
//! │  More than three decimal places is rejected, never rounded away.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## JSON
//! Accepts a number or a numeric string (`3`, `1.5`, `"0.25"`). Whole
//! quantities serialize as integers, others as decimals.
//!
//! ## Usage
//! ```rust
//! use almacen_core::quantity::Quantity;
//! use rust_decimal::Decimal;
//!
//! let weighed = Quantity::from_decimal(Decimal::new(15, 1)).unwrap(); // 1.5
//! assert_eq!(weighed.milli(), 1500);
//! assert_eq!(weighed.to_string(), "1.5");
//! assert_eq!(Quantity::from_units(3).to_string(), "3");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Thousandths in one unit of measure.
pub const QUANTITY_SCALE: i64 = 1_000;

/// Decimal places a quantity may carry.
pub const QUANTITY_DECIMALS: u32 = 3;

/// An amount of a product in thousandths of its unit of measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Quantity(i64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    /// Creates a quantity from thousandths of a unit.
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a quantity of whole units, saturating at the i64 range.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units.saturating_mul(QUANTITY_SCALE))
    }

    /// Converts a decimal amount exactly.
    ///
    /// `None` when the amount has more than three decimal places or does
    /// not fit in i64 thousandths.
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        if amount.normalize().scale() > QUANTITY_DECIMALS {
            return None;
        }
        let milli = amount.checked_mul(Decimal::from(QUANTITY_SCALE))?;
        milli.to_i64().map(Quantity)
    }

    /// Returns the value in thousandths of a unit.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Returns the quantity as a decimal without trailing zeros.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, QUANTITY_DECIMALS).normalize()
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % QUANTITY_SCALE == 0 {
            serializer.serialize_i64(self.0 / QUANTITY_SCALE)
        } else {
            let value = self.to_decimal().to_f64().unwrap_or(f64::NAN);
            serializer.serialize_f64(value)
        }
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Quantity::from_decimal(amount).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "quantity {amount} must have at most {QUANTITY_DECIMALS} decimal places"
            ))
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A sale total summed in floats drifts away from the sum of its lines.  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every amount is stored, summed and compared as i64 cents.           │
//! │    Decimal input is converted ONCE, at the API boundary.               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use almacen_core::money::Money;
//!
//! let price = Money::from_cents(1099); // 10.99
//! assert_eq!(price.to_string(), "10.99");
//!
//! // 1.5 kg at 10.99 = 16.485, rounded once to the cent
//! assert_eq!(Money::from_milli_cents(1099 * 1500).unwrap().cents(), 1649);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// CostAndPrice.cost ──► pricing::compute_sale_price ──► CostAndPrice.sale_price
///                                                              │
///                          SaleDetail.unit_price ◄── captured at checkout
///                                   │
///                          Sale.total = Σ unit_price × quantity
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount (e.g. `10.995`) to money, rounding to the
    /// nearest cent with midpoints away from zero.
    ///
    /// Returns `None` when the amount does not fit in i64 cents.
    ///
    /// ## Example
    /// ```rust
    /// use almacen_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let amount = Decimal::new(10995, 3); // 10.995
    /// assert_eq!(Money::from_decimal(amount).unwrap().cents(), 1100);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let cents = rounded.checked_mul(Decimal::ONE_HUNDRED)?;
        cents.to_i64().map(Money)
    }

    /// Returns the amount as a two-place decimal (`1099` → `10.99`).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Rounds an amount in thousandths of a cent to whole cents, midpoints
    /// away from zero.
    ///
    /// `unit price cents × quantity thousandths` lands in this unit, so a
    /// sale total is summed exactly and rounded here once.
    ///
    /// Returns `None` when the result does not fit in i64 cents.
    pub fn from_milli_cents(milli_cents: i128) -> Option<Self> {
        let half = 500;
        let rounded = if milli_cents >= 0 {
            milli_cents.checked_add(half)? / 1000
        } else {
            milli_cents.checked_sub(half)? / 1000
        };
        i64::try_from(rounded).ok().map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount with two decimal places (`1099` → `10.99`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
    }

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        let cases = [
            ("100", 10000),
            ("10.99", 1099),
            ("10.995", 1100),
            ("10.994", 1099),
            ("0.005", 1),
            ("-0.005", -1),
        ];
        for (input, expected) in cases {
            let amount = Decimal::from_str(input).unwrap();
            assert_eq!(Money::from_decimal(amount).unwrap().cents(), expected, "{input}");
        }
    }

    #[test]
    fn test_from_decimal_overflow() {
        assert!(Money::from_decimal(Decimal::MAX).is_none());
    }

    #[test]
    fn test_to_decimal_keeps_two_places() {
        assert_eq!(Money::from_cents(13200).to_decimal().to_string(), "132.00");
        assert_eq!(Money::from_cents(5).to_decimal().to_string(), "0.05");
    }

    #[test]
    fn test_from_milli_cents_rounds_once() {
        assert_eq!(Money::from_milli_cents(1_648_500), Some(Money::from_cents(1649)));
        assert_eq!(Money::from_milli_cents(1_648_499), Some(Money::from_cents(1648)));
        assert_eq!(Money::from_milli_cents(-1_500), Some(Money::from_cents(-2)));
        assert_eq!(Money::from_milli_cents(3_000_000), Some(Money::from_cents(3000)));
        assert_eq!(Money::from_milli_cents(i128::MAX), None);
        assert_eq!(Money::from_milli_cents(i64::MAX as i128 * 1000 + 1000), None);
    }

    #[test]
    fn test_sign() {
        assert!(!Money::default().is_negative());
        assert!(Money::from_cents(-1).is_negative());
    }
}

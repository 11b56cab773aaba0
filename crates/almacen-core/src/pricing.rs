//! # Pricing
//!
//! Derivation of sale prices from cost and margin, and the arithmetic of a
//! supplier-wide price increase.
//!
//! ## Formulas
//! ```text
//! sale_price = round(cost × (1 + margin / 100), 2)
//!   margin in basis points (1% = 100):
//!   sale_price_cents = (cost_cents × (10000 + margin_bps) + 5000) / 10000
//!
//! new_cost = round(cost × (1 + increase / 100), 2)
//!   increase in parts per million of the cost (1% = 10000):
//!   new_cost_cents = (cost_cents × (1000000 + increase_ppm) + 500000) / 1000000
//!
//! Numerators are never negative (cost ≥ 0, factors ≥ -100%), so integer
//! division truncates toward zero and the added half gives round-half-up.
//! ```
//!
//! The bulk repricing statement in almacen-db evaluates the same
//! expressions, so a repriced row satisfies exactly the invariant checked
//! here.
//!
//! ## Example
//! ```rust
//! use almacen_core::money::Money;
//! use almacen_core::pricing::{compute_sale_price, RepriceRequest};
//! use almacen_core::types::Percentage;
//! use rust_decimal::Decimal;
//!
//! let request = RepriceRequest::new("supplier-1", Decimal::TEN).unwrap();
//! let cost = request.apply_to(Money::from_cents(10000)).unwrap();
//! assert_eq!(cost.cents(), 11000);
//!
//! let price = compute_sale_price(cost, Percentage::from_bps(2000)).unwrap();
//! assert_eq!(price.cents(), 13200);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Percentage;

/// Basis points in 100%.
pub const BPS_SCALE: i64 = 10_000;

/// Parts per million in 100%.
pub const PPM_SCALE: i64 = 1_000_000;

/// Largest accepted increase, in percent.
///
/// Keeps `(cost_cents % PPM_SCALE) × (PPM_SCALE + increase_ppm)` inside i64
/// in the repricing statement.
pub const MAX_INCREASE_PERCENT: i64 = 1_000_000;

/// Computes `round(cost × (1 + margin / 100), 2)`.
///
/// ## Errors
/// - [`CoreError::InvalidPrice`] when `cost` is negative or `margin` is
///   below -100%
/// - [`CoreError::AmountOverflow`] when the result leaves i64 cents
pub fn compute_sale_price(cost: Money, margin: Percentage) -> CoreResult<Money> {
    if cost.is_negative() {
        return Err(CoreError::InvalidPrice {
            reason: format!("cost must not be negative, got {cost}"),
        });
    }
    if margin < Percentage::MINUS_ONE_HUNDRED {
        return Err(CoreError::InvalidPrice {
            reason: format!("margin must be at least -100%, got {margin}"),
        });
    }
    scale(cost, margin.bps(), BPS_SCALE, "sale price")
}

/// `round(amount × (scale + delta) / scale)` in i128.
fn scale(amount: Money, delta: i64, scale: i64, context: &str) -> CoreResult<Money> {
    let factor = (scale + delta) as i128;
    let scaled = (amount.cents() as i128 * factor + (scale / 2) as i128) / scale as i128;
    i64::try_from(scaled)
        .map(Money::from_cents)
        .map_err(|_| CoreError::AmountOverflow {
            context: context.to_string(),
        })
}

// =============================================================================
// Reprice Request
// =============================================================================

/// A validated supplier-wide price change.
///
/// Constructing one is the only way to reach the bulk repricing statement,
/// so a zero or sub -100% increase never gets to the database.
///
/// The increase is kept as sent and as a factor in parts per million of
/// the cost. Four decimal places of a percent survive (`0.0001%` = 1 ppm);
/// anything finer is rounded away in the factor only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepriceRequest {
    supplier_id: String,
    increase: Decimal,
    increase_ppm: i64,
}

impl RepriceRequest {
    /// Validates a reprice request.
    ///
    /// ## Rules
    /// - `supplier_id` must not be blank
    /// - `increase` must not be exactly zero (a no-op is a caller error);
    ///   any non-zero value, however small, is accepted
    /// - `increase` must be at least -100% (costs never go negative) and at
    ///   most [`MAX_INCREASE_PERCENT`]
    pub fn new(supplier_id: impl Into<String>, increase: Decimal) -> Result<Self, ValidationError> {
        let supplier_id = supplier_id.into().trim().to_string();
        if supplier_id.is_empty() {
            return Err(ValidationError::Required {
                field: "supplier_id".to_string(),
            });
        }
        if increase.is_zero() {
            return Err(ValidationError::MustBeNonZero {
                field: "percentage_increase".to_string(),
            });
        }
        if increase < -Decimal::ONE_HUNDRED || increase > Decimal::from(MAX_INCREASE_PERCENT) {
            return Err(ValidationError::OutOfRange {
                field: "percentage_increase".to_string(),
                min: -100,
                max: MAX_INCREASE_PERCENT,
            });
        }
        let increase_ppm = (increase * Decimal::from(PPM_SCALE / 100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "percentage_increase".to_string(),
                reason: "out of range".to_string(),
            })?;
        Ok(RepriceRequest {
            supplier_id,
            increase,
            increase_ppm,
        })
    }

    pub fn supplier_id(&self) -> &str {
        &self.supplier_id
    }

    /// The increase in percent, as requested.
    pub fn increase(&self) -> Decimal {
        self.increase
    }

    /// The increase in parts per million of the cost.
    pub fn increase_ppm(&self) -> i64 {
        self.increase_ppm
    }

    /// Computes the repriced cost of one product.
    ///
    /// ## Errors
    /// - [`CoreError::InvalidPrice`] when `cost` is negative
    /// - [`CoreError::AmountOverflow`] when the new cost leaves i64 cents
    pub fn apply_to(&self, cost: Money) -> CoreResult<Money> {
        if cost.is_negative() {
            return Err(CoreError::InvalidPrice {
                reason: format!("cost must not be negative, got {cost}"),
            });
        }
        scale(cost, self.increase_ppm, PPM_SCALE, "repriced cost")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

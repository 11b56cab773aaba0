//! # Checkout Accumulator
//!
//! Pure bookkeeping for one sale submission: which lines were fulfilled at
//! which captured price, which lines failed and why, and the sale total.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout Lifecycle                              │
//! │                                                                         │
//! │   Checkout::new()                                                       │
//! │        │                                                                │
//! │        ├── accept(PricedLine)                    stock taken, priced   │
//! │        ├── reject(LineProblem)                   line cannot be filled │
//! │        │        (one call per requested line, in request order)        │
//! │        ▼                                                                │
//! │   finish()                                                              │
//! │        ├── any rejection? → Err(CheckoutRejected(all problems))        │
//! │        └── otherwise      → Ok(CheckoutSummary { lines, total })       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The database layer drives this inside a unit of work; a rejected
//! summary means the unit of work is rolled back.

use crate::error::{CoreError, CoreResult, LineProblem};
use crate::money::Money;
use crate::quantity::Quantity;

/// A fulfilled line with its price captured at checkout time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    /// Position in the request (0-based).
    pub line_no: i64,
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub quantity: Quantity,
    pub unit_price: Money,
}

/// Accepted lines and total of a checkout with no problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub lines: Vec<PricedLine>,
    pub total: Money,
}

/// Collects per-line outcomes of a checkout.
///
/// The total is kept exact, in thousandths of a cent, and rounded to the
/// cent once in [`Checkout::finish`]. Lines are never rounded on their own.
#[derive(Debug, Default)]
pub struct Checkout {
    lines: Vec<PricedLine>,
    problems: Vec<LineProblem>,
    exact_total: i128,
    overflowed: bool,
}

impl Checkout {
    pub fn new() -> Self {
        Checkout::default()
    }

    /// Records a line whose stock was taken at `unit_price`.
    pub fn accept(&mut self, line: PricedLine) {
        let amount = line.unit_price.cents() as i128 * line.quantity.milli() as i128;
        match self.exact_total.checked_add(amount) {
            Some(total) => self.exact_total = total,
            None => self.overflowed = true,
        }
        self.lines.push(line);
    }

    /// Records a line that cannot be fulfilled.
    pub fn reject(&mut self, problem: LineProblem) {
        self.problems.push(problem);
    }

    /// Closes the checkout.
    ///
    /// ## Errors
    /// - [`CoreError::CheckoutRejected`] with every recorded problem, in
    ///   the order they were recorded
    /// - [`CoreError::AmountOverflow`] when the total left i64 cents
    pub fn finish(self) -> CoreResult<CheckoutSummary> {
        if !self.problems.is_empty() {
            return Err(CoreError::CheckoutRejected(self.problems));
        }
        let total = Money::from_milli_cents(self.exact_total)
            .filter(|_| !self.overflowed)
            .ok_or_else(|| CoreError::AmountOverflow {
                context: "sale total".to_string(),
            })?;
        Ok(CheckoutSummary {
            lines: self.lines,
            total,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(line_no: i64, product_id: &str, quantity_milli: i64, price_cents: i64) -> PricedLine {
        PricedLine {
            line_no,
            product_id: product_id.to_string(),
            name: format!("Product {product_id}"),
            sku: format!("SKU-{product_id}"),
            quantity: Quantity::from_milli(quantity_milli),
            unit_price: Money::from_cents(price_cents),
        }
    }

    #[test]
    fn test_total_sums_lines() {
        let mut checkout = Checkout::new();
        checkout.accept(line(0, "a", 2000, 1099));
        checkout.accept(line(1, "b", 1000, 250));

        let summary = checkout.finish().unwrap();
        assert_eq!(summary.total.cents(), 2448);
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[1].product_id, "b");
    }

    #[test]
    fn test_fractional_lines_are_rounded_once() {
        // 1.5 × 10.99 = 16.485 and 0.333 × 3.00 = 0.999
        // exact sum 17.484 → 17.48 (rounding each line first would give 17.49)
        let mut checkout = Checkout::new();
        checkout.accept(line(0, "cheese", 1500, 1099));
        checkout.accept(line(1, "ham", 333, 300));

        let summary = checkout.finish().unwrap();
        assert_eq!(summary.total, Money::from_cents(1748));
    }

    #[test]
    fn test_any_problem_rejects_whole_checkout() {
        let mut checkout = Checkout::new();
        checkout.accept(line(0, "a", 1000, 100));
        checkout.reject(LineProblem::InsufficientStock {
            product_id: "b".to_string(),
            name: "B".to_string(),
            available: Quantity::from_units(4),
            requested: Quantity::from_units(9),
        });
        checkout.reject(LineProblem::ProductNotFound {
            product_id: "c".to_string(),
        });

        match checkout.finish() {
            Err(CoreError::CheckoutRejected(problems)) => {
                assert_eq!(problems.len(), 2);
                assert_eq!(problems[0].product_id(), "b");
                assert_eq!(problems[1].product_id(), "c");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let mut checkout = Checkout::new();
        checkout.accept(line(0, "a", 2000, i64::MAX / 2 + 1));
        assert!(matches!(
            checkout.finish(),
            Err(CoreError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_empty_checkout_has_zero_total() {
        let summary = Checkout::new().finish().unwrap();
        assert_eq!(summary.total.cents(), 0);
        assert!(summary.lines.is_empty());
    }
}

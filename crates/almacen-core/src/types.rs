//! # Domain Types
//!
//! Core domain types used throughout Almacen POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Supplier     │   │    Product      │   │    Category     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄┐ │  id (UUID)      │──►│  id (UUID)      │       │
//! │  │  trade_name     │ │ │  sku (business) │   │  name           │       │
//! │  │  tax_id, phone  │ │ │  stock_on_hand  │   └─────────────────┘       │
//! │  └─────────────────┘ │ └────────┬────────┘                              │
//! │                      │          │ 1:1                                   │
//! │                      │ ┌────────▼────────┐                              │
//! │                      └─│  CostAndPrice   │   sale_price is ALWAYS       │
//! │                        │  cost_cents     │   derived from cost+margin   │
//! │                        │  margin_bps     │                              │
//! │                        │  sale_price     │                              │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │      Sale       │◄──│   SaleDetail    │   Both append-only           │
//! │  │  id, created_at │1:N│  quantity       │                              │
//! │  │  total_cents    │   │  unit_price     │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Entities have a UUID `id` used for relations and, where relevant, a
//! human-readable business key (`sku` for products).

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// 1 basis point = 0.01%, so `2000` bps = 20% and `-550` bps = -5.5%.
/// Used for profit margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Percentage(i64);

impl Percentage {
    /// -100%: the lowest value that keeps derived amounts non-negative.
    pub const MINUS_ONE_HUNDRED: Percentage = Percentage(-10_000);

    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Percentage(bps)
    }

    /// Converts a decimal percentage (`12.5` = 12.5%) to basis points,
    /// rounding midpoints away from zero. `None` if out of range.
    pub fn from_decimal(pct: Decimal) -> Option<Self> {
        let rounded = pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let bps = rounded.checked_mul(Decimal::ONE_HUNDRED)?;
        bps.to_i64().map(Percentage)
    }

    /// Returns the percentage in basis points.
    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    /// Returns the percentage as a two-place decimal (`1050` → `10.50`).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_decimal())
    }
}

// =============================================================================
// Supplier & Category
// =============================================================================

/// A supplier that products are bought from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: String,
    /// Trading name shown in listings.
    pub trade_name: String,
    /// Tax identification number.
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for registering a supplier.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSupplier {
    pub trade_name: String,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Amount currently available, in the unit of measure. Never negative.
    pub stock_on_hand: Quantity,

    /// Reorder threshold.
    pub stock_minimum: Quantity,

    pub category_id: Option<String>,

    /// e.g. "unit", "kg", "pack".
    pub unit_of_measure: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product together with its initial cost record.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub stock_on_hand: Quantity,
    pub stock_minimum: Quantity,
    pub category_id: Option<String>,
    pub unit_of_measure: String,
    pub supplier_id: String,
    pub cost: Money,
    pub margin: Percentage,
}

// =============================================================================
// Cost & Price
// =============================================================================

/// Cost record of a product and the sale price derived from it.
///
/// ## Invariant
/// `sale_price == round(cost × (1 + margin / 100), 2)`, see
/// [`crate::pricing::compute_sale_price`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CostAndPrice {
    pub product_id: String,
    pub supplier_id: String,
    pub cost_cents: i64,
    pub margin_bps: i64,
    pub sale_price_cents: i64,
    pub updated_at: DateTime<Utc>,
}

impl CostAndPrice {
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    #[inline]
    pub fn margin(&self) -> Percentage {
        Percentage::from_bps(self.margin_bps)
    }

    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }
}

/// A product joined with its current sale price (search results).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductListing {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub stock_on_hand: Quantity,
    pub unit_of_measure: String,
    pub sale_price_cents: i64,
}

impl ProductListing {
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One requested line of a sale: which product and how much of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineRequest {
    pub product_id: String,
    pub quantity: Quantity,
}

impl SaleLineRequest {
    /// A line of whole units.
    pub fn new(product_id: impl Into<String>, units: i64) -> Self {
        SaleLineRequest::with_quantity(product_id, Quantity::from_units(units))
    }

    /// A line of any quantity, e.g. 0.75 kg.
    pub fn with_quantity(product_id: impl Into<String>, quantity: Quantity) -> Self {
        SaleLineRequest {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A committed sale. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item of a committed sale.
/// Uses snapshot pattern to freeze product name and SKU at time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleDetail {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Position in the original request (0-based).
    pub line_no: i64,
    /// SKU at time of sale (frozen).
    pub sku_snapshot: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    pub quantity: Quantity,
    /// Unit price in cents observed during checkout (frozen).
    pub unit_price_cents: i64,
}

impl SaleDetail {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleReceipt {
    pub sale: Sale,
    pub items_sold: usize,
}

/// A sale with its line items, in line order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleWithDetails {
    pub sale: Sale,
    pub details: Vec<SaleDetail>,
}

// =============================================================================
// Unit Tests
// =============================================================================

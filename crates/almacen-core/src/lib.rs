//! # almacen-core: Pure Business Logic for Almacen POS
//!
//! This crate holds the domain model and every rule that can be decided
//! without touching storage: money math, price derivation, checkout
//! bookkeeping and input validation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Almacen POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    almacen-api (axum)                           │   │
//! │  │    POST /sales   GET /sales/{id}   PUT /prices/update-by-...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                almacen-db (Database Layer)                      │   │
//! │  │     UnitOfWork, SaleProcessor, repositories, migrations         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ almacen-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  types   │ │  money   │ │ pricing  │ │ checkout │          │   │
//! │  │   │ Product  │ │  Money   │ │ sale     │ │ per-line │          │   │
//! │  │   │  Sale    │ │  cents   │ │ price    │ │ outcomes │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Supplier, Sale, Percentage, etc.)
//! - [`money`] - Money type with integer arithmetic
//! - [`quantity`] - Stock and sale quantities in thousandths of a unit
//! - [`pricing`] - Sale price derivation and reprice requests
//! - [`checkout`] - Per-line accumulation of a sale submission
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use almacen_core::pricing::compute_sale_price;
//! use almacen_core::{Money, Percentage};
//!
//! let cost = Money::from_cents(10000); // 100.00
//! let margin = Percentage::from_bps(2000); // 20%
//!
//! assert_eq!(compute_sale_price(cost, margin).unwrap().to_string(), "120.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod quantity;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{Checkout, CheckoutSummary, PricedLine};
pub use error::{CoreError, CoreResult, LineProblem, ValidationError};
pub use money::Money;
pub use pricing::{compute_sale_price, RepriceRequest};
pub use quantity::Quantity;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines in a single sale request.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum rows returned by product search.
pub const SEARCH_LIMIT: i64 = 50;

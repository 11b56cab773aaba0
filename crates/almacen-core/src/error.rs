//! # Error Types
//!
//! Domain-specific error types for almacen-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  almacen-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  ├── LineProblem      - Why one sale line cannot be fulfilled          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  almacen-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── StoreError       - CoreError | DbError                            │
//! │                                                                         │
//! │  HTTP errors (in app)                                                  │
//! │  └── ApiError         - Status code + JSON body                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → Client    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::quantity::Quantity;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// One or more sale lines cannot be fulfilled.
    ///
    /// ## When This Occurs
    /// A checkout found unknown products, products without a price, or
    /// lines asking for more than the stock on hand. Every problem found in
    /// the cart is reported, not only the first one.
    ///
    /// ```text
    /// items: [A×2 ✓, B×9 ✗ (stock 4), C×1 ✗ (unknown)]
    ///      │
    ///      ▼
    /// CheckoutRejected([InsufficientStock{B..}, ProductNotFound{C}])
    ///      │
    ///      ▼
    /// Nothing persisted, A's stock untouched
    /// ```
    #[error("Sale rejected: {} line(s) cannot be fulfilled", .0.len())]
    CheckoutRejected(Vec<LineProblem>),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// A price could not be derived from its inputs.
    #[error("Invalid price input: {reason}")]
    InvalidPrice { reason: String },

    /// A money amount left the representable range.
    #[error("Amount overflow while computing {context}")]
    AmountOverflow { context: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Line Problem
// =============================================================================

/// Why a single sale line cannot be fulfilled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineProblem {
    #[error("Product {product_id} not found")]
    ProductNotFound { product_id: String },

    #[error("Insufficient stock for {name}. Current stock: {available}, requested: {requested}")]
    InsufficientStock {
        product_id: String,
        name: String,
        available: Quantity,
        requested: Quantity,
    },

    #[error("Product {name} has no sale price")]
    MissingPrice { product_id: String, name: String },
}

impl LineProblem {
    /// The product this problem refers to.
    pub fn product_id(&self) -> &str {
        match self {
            LineProblem::ProductNotFound { product_id }
            | LineProblem::InsufficientStock { product_id, .. }
            | LineProblem::MissingPrice { product_id, .. } => product_id,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any unit of work is opened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be zero.
    #[error("{field} must be a non-zero number")]
    MustBeNonZero { field: String },

    /// Invalid format (e.g., not a number, disallowed characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Collection has no elements.
    #[error("{field} must contain at least one element")]
    Empty { field: String },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

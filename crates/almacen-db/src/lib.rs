//! # almacen-db: Database Layer for Almacen POS
//!
//! This crate provides database access for Almacen POS.
//! It uses SQLite for storage with sqlx for async operations, or
//! PostgreSQL when built with the `postgres` feature (see [`backend`]).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Almacen POS Data Flow                            │
//! │                                                                         │
//! │  HTTP handler (POST /sales)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    almacen-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐  ┌───────────────┐  ┌──────────────────┐   │   │
//! │  │   │   Database    │  │ SaleProcessor │  │   Repositories   │   │   │
//! │  │   │   (pool.rs)   │  │ (checkout.rs) │  │ catalog, price,  │   │   │
//! │  │   │               │  │               │  │ product, sale    │   │   │
//! │  │   │ DbPool        │◄─│ UnitOfWork    │─►│                  │   │   │
//! │  │   │ Migrations    │  │ Checkout      │  │                  │   │   │
//! │  │   └───────────────┘  └───────────────┘  └──────────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        SQLite ./data/almacen.db (WAL)  or  PostgreSQL           │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`backend`] - Engine selection (SQLite or PostgreSQL)
//! - [`pool`] - Connection pool creation and configuration
//! - [`unit_of_work`] - Scoped transactions
//! - [`checkout`] - Sale processing
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use almacen_core::SaleLineRequest;
//! use almacen_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./data/almacen.db")).await?;
//!
//! let receipt = db
//!     .processor()
//!     .submit_sale(&[SaleLineRequest::new(product_id, 2)])
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod unit_of_work;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::BACKEND_NAME;
pub use checkout::SaleProcessor;
pub use error::{DbError, DbResult, StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use unit_of_work::UnitOfWork;

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::price::PriceRepository;
pub use repository::sale::SaleRepository;

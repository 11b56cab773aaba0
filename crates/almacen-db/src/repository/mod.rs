//! # Repository Module
//!
//! Database repository implementations for Almacen POS.
//!
//! ## Two Kinds of Access
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Pool-backed repositories (one statement or their own unit of work)    │
//! │  ├── CatalogRepository  suppliers, categories, products, search        │
//! │  ├── PriceRepository    cost/price rows, bulk reprice                  │
//! │  └── SaleRepository     reading committed sales                        │
//! │                                                                         │
//! │  Connection-scoped functions (run inside a caller's UnitOfWork)        │
//! │  ├── product::try_decrement_stock / find_sale_candidate                │
//! │  └── sale::insert_sale / insert_detail                                 │
//! │                                                                         │
//! │  The second kind take `&mut DbConnection` so the compiler keeps        │
//! │  every statement of a checkout on the same transaction.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod price;
pub mod product;
pub mod sale;

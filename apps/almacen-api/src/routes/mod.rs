//! HTTP routes.
//!
//! ## Route Table
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  POST /sales                     sales::submit_sale                 │
//! │  GET  /sales/{id}                sales::get_sale                    │
//! │  PUT  /prices/update-by-supplier prices::update_by_supplier         │
//! │  GET  /suppliers  POST           catalog::{list,create}_supplier    │
//! │  GET  /categories POST           catalog::{list,create}_category    │
//! │  POST /products                  catalog::create_product            │
//! │  GET  /products/search?q=        catalog::search_products           │
//! │  GET  /health/db                 health::db_health                  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod health;
pub mod prices;
pub mod sales;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Builds the application router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sales", post(sales::submit_sale))
        .route("/sales/{id}", get(sales::get_sale))
        .route("/prices/update-by-supplier", put(prices::update_by_supplier))
        .route(
            "/suppliers",
            get(catalog::list_suppliers).post(catalog::create_supplier),
        )
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route("/products", post(catalog::create_product))
        .route("/products/search", get(catalog::search_products))
        .route("/health/db", get(health::db_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

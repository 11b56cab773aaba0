//! # Almacen API
//!
//! HTTP/JSON front end of Almacen POS.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Almacen API Server                               │
//! │                                                                         │
//! │  Client ───► axum (3000) ───► routes ───► almacen-db ───► SQLite       │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                              ApiError → status + JSON                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;

use almacen_db::Database;

pub use routes::router;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

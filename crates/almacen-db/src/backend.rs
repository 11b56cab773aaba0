//! # Database Engine
//!
//! The engine is picked at compile time:
//!
//! ```text
//! default               → SQLite   (embedded file, one writer at a time)
//! --features postgres   → PostgreSQL (row locks, parallel writers)
//! ```
//!
//! Repositories and the unit of work name only these aliases, and every
//! statement uses `$N` placeholders, which both engines accept.

#[cfg(not(feature = "postgres"))]
pub use sqlx::{Sqlite as Backend, SqliteConnection as DbConnection, SqlitePool as DbPool};

#[cfg(feature = "postgres")]
pub use sqlx::{PgConnection as DbConnection, PgPool as DbPool, Postgres as Backend};

/// Engine name reported in logs and `/health`.
#[cfg(not(feature = "postgres"))]
pub const BACKEND_NAME: &str = "sqlite";

/// Engine name reported in logs and `/health`.
#[cfg(feature = "postgres")]
pub const BACKEND_NAME: &str = "postgres";

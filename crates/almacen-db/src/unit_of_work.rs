//! # Unit of Work
//!
//! A scoped database transaction that groups several repository writes into
//! one all-or-nothing change.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Unit of Work Lifecycle                             │
//! │                                                                         │
//! │  db.begin().await?                     BEGIN                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  try_decrement_stock(uow.conn(), ..)   ┐                                │
//! │  insert_sale(uow.conn(), ..)           ├ same connection, same tx       │
//! │  insert_detail(uow.conn(), ..)         ┘                                │
//! │       │                                                                 │
//! │       ├── uow.commit().await?          COMMIT   (all visible at once)   │
//! │       ├── uow.rollback().await?        ROLLBACK (nothing happened)      │
//! │       └── dropped (`?`, cancel, panic) ROLLBACK on the pooled conn      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `commit` and `rollback` take `self`, so a unit of work finishes at most
//! once and cannot be used afterwards.
//!
//! ## Locking on SQLite
//! `begin` issues a deferred `BEGIN`. The write lock is taken by the first
//! write statement and held until commit or rollback; other writers wait up
//! to the configured busy timeout. Callers that read-then-write a shared
//! counter must make a write their first statement so that no other writer
//! can slip in between the read and the write.
//!
//! ## Locking on PostgreSQL
//! A conditional `UPDATE` locks only the row it changes, until commit or
//! rollback. Units of work touching different rows never wait for each
//! other. Two that lock the same rows must take them in the same order or
//! one of them is aborted as a deadlock.

use sqlx::Transaction;
use tracing::{debug, warn};

use crate::backend::{Backend, DbConnection, DbPool};
use crate::error::{DbError, DbResult};

/// An open database transaction.
#[derive(Debug)]
pub struct UnitOfWork {
    tx: Transaction<'static, Backend>,
}

impl UnitOfWork {
    /// Opens a unit of work on a pooled connection.
    pub async fn begin(pool: &DbPool) -> DbResult<Self> {
        let tx = pool
            .begin()
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::PoolExhausted => DbError::PoolExhausted,
                other => DbError::TransactionFailed(other.to_string()),
            })?;
        debug!("Unit of work started");
        Ok(UnitOfWork { tx })
    }

    /// The connection every statement of this unit of work must run on.
    pub fn conn(&mut self) -> &mut DbConnection {
        &mut self.tx
    }

    /// Makes every change of this unit of work durable and visible.
    pub async fn commit(self) -> DbResult<()> {
        self.tx.commit().await.map_err(|e| {
            warn!(error = %e, "Unit of work commit failed");
            DbError::TransactionFailed(e.to_string())
        })?;
        debug!("Unit of work committed");
        Ok(())
    }

    /// Discards every change of this unit of work.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!("Unit of work rolled back");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

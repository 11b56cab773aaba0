//! # Product Stock Operations
//!
//! Connection-scoped product statements used inside a unit of work.
//!
//! ## Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read, check in Rust, write back                             │
//! │     SELECT stock_on_hand ...         → 5                                │
//! │     (another sale takes 3 here)                                        │
//! │     UPDATE products SET stock_on_hand = 5 - 4   → lost update          │
//! │                                                                         │
//! │  ✅ CORRECT: check and write in ONE statement                          │
//! │     UPDATE products                                                     │
//! │     SET stock_on_hand = stock_on_hand - $2                              │
//! │     WHERE id = $1 AND stock_on_hand >= $2                               │
//! │                                                                         │
//! │     rows_affected = 1 → stock taken                                    │
//! │     rows_affected = 0 → unknown product OR not enough stock            │
//! │                         (diagnose with find_sale_candidate)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function takes the unit of work's connection so that the decrement,
//! the price read and the sale insert commit or roll back together.
//!
//! Stock is stored in thousandths of the unit of measure ([`Quantity`]), so
//! the comparison and the subtraction stay integer arithmetic.

use almacen_core::Quantity;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::backend::DbConnection;
use crate::error::DbResult;

/// What a checkout needs to know about a product.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SaleCandidate {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub stock_on_hand: Quantity,
    /// `None` when the product has no cost/price row.
    pub sale_price_cents: Option<i64>,
}

/// Takes `quantity` of a product if at least that much is on hand.
///
/// On PostgreSQL the changed row stays locked until the unit of work ends.
///
/// ## Returns
/// * `Ok(true)` - Stock decremented
/// * `Ok(false)` - Product missing or stock too low; nothing changed
pub async fn try_decrement_stock(
    conn: &mut DbConnection,
    product_id: &str,
    quantity: Quantity,
    now: DateTime<Utc>,
) -> DbResult<bool> {
    debug!(product_id = %product_id, quantity = %quantity, "Decrementing stock");

    let result = sqlx::query(
        r#"
        UPDATE products
        SET
            stock_on_hand = stock_on_hand - $2,
            updated_at = $3
        WHERE id = $1 AND stock_on_hand >= $2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Reads a product with its current sale price.
///
/// ## Returns
/// * `Ok(Some(SaleCandidate))` - Product found (price may be absent)
/// * `Ok(None)` - Product not found
pub async fn find_sale_candidate(
    conn: &mut DbConnection,
    product_id: &str,
) -> DbResult<Option<SaleCandidate>> {
    let candidate = sqlx::query_as::<_, SaleCandidate>(
        r#"
        SELECT
            p.id,
            p.name,
            p.sku,
            p.stock_on_hand,
            cp.sale_price_cents
        FROM products p
        LEFT JOIN costs_and_prices cp ON cp.product_id = p.id
        WHERE p.id = $1
        "#,
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(candidate)
}

// =============================================================================
// Unit Tests
// =============================================================================

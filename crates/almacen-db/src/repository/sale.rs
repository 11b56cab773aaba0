//! # Sale Repository
//!
//! Database operations for sales and sale details.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CHECKOUT (inside the processor's unit of work)                     │
//! │     └── insert_sale()   → one Sale row with the final total            │
//! │     └── insert_detail() → one SaleDetail per requested line            │
//! │                                                                         │
//! │  2. COMMIT                                                             │
//! │     └── sale and details become visible together                       │
//! │                                                                         │
//! │  3. READ (any time after)                                              │
//! │     └── SaleRepository::get_by_id() / get_details()                    │
//! │                                                                         │
//! │  There is no step 4: triggers reject UPDATE and DELETE on both tables. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::backend::{DbConnection, DbPool};
use crate::error::DbResult;
use almacen_core::{Sale, SaleDetail};

/// Inserts a sale row on the unit of work's connection.
pub async fn insert_sale(conn: &mut DbConnection, sale: &Sale) -> DbResult<()> {
    debug!(id = %sale.id, total_cents = sale.total_cents, "Inserting sale");

    sqlx::query(
        r#"
        INSERT INTO sales (id, created_at, total_cents)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&sale.id)
    .bind(sale.created_at)
    .bind(sale.total_cents)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Inserts a sale detail row on the unit of work's connection.
///
/// ## Snapshot Pattern
/// Product name and SKU are copied to the detail together with the unit
/// price, so a receipt reads the same after the product is renamed or
/// repriced.
pub async fn insert_detail(conn: &mut DbConnection, detail: &SaleDetail) -> DbResult<()> {
    debug!(
        sale_id = %detail.sale_id,
        product_id = %detail.product_id,
        line_no = detail.line_no,
        "Inserting sale detail"
    );

    sqlx::query(
        r#"
        INSERT INTO sale_details (
            id, sale_id, product_id, line_no,
            sku_snapshot, name_snapshot, quantity, unit_price_cents
        ) VALUES (
            $1, $2, $3, $4,
            $5, $6, $7, $8
        )
        "#,
    )
    .bind(&detail.id)
    .bind(&detail.sale_id)
    .bind(&detail.product_id)
    .bind(detail.line_no)
    .bind(&detail.sku_snapshot)
    .bind(&detail.name_snapshot)
    .bind(detail.quantity)
    .bind(detail.unit_price_cents)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Repository for reading committed sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: DbPool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: DbPool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, created_at, total_cents
            FROM sales
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets the details of a sale in request order.
    pub async fn get_details(&self, sale_id: &str) -> DbResult<Vec<SaleDetail>> {
        let details = sqlx::query_as::<_, SaleDetail>(
            r#"
            SELECT
                id,
                sale_id,
                product_id,
                line_no,
                sku_snapshot,
                name_snapshot,
                quantity,
                unit_price_cents
            FROM sale_details
            WHERE sale_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Counts committed sales (for diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(all(test, not(feature = "postgres")))]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn sale(id: &str, total_cents: i64) -> Sale {
        Sale {
            id: id.to_string(),
            created_at: Utc::now(),
            total_cents,
        }
    }

    #[tokio::test]
    async fn test_committed_sale_is_readable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut uow = db.begin().await.unwrap();
        insert_sale(uow.conn(), &sale("s1", 1500)).await.unwrap();
        uow.commit().await.unwrap();

        let found = db.sales().get_by_id("s1").await.unwrap().unwrap();
        assert_eq!(found.total_cents, 1500);
        assert!(db.sales().get_details("s1").await.unwrap().is_empty());
        assert!(db.sales().get_by_id("missing").await.unwrap().is_none());
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sales_are_immutable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut uow = db.begin().await.unwrap();
        insert_sale(uow.conn(), &sale("s1", 1500)).await.unwrap();
        uow.commit().await.unwrap();

        let update = sqlx::query("UPDATE sales SET total_cents = 1 WHERE id = 's1'")
            .execute(db.pool())
            .await
            .map_err(DbError::from);
        assert!(matches!(update, Err(DbError::ConstraintViolation { .. })));

        let delete = sqlx::query("DELETE FROM sales WHERE id = 's1'")
            .execute(db.pool())
            .await
            .map_err(DbError::from);
        assert!(matches!(delete, Err(DbError::ConstraintViolation { .. })));
    }
}

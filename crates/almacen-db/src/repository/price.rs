//! # Price Repository
//!
//! Cost/price rows and the supplier-wide repricing statement.
//!
//! ## Bulk Reprice
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PUT /prices/update-by-supplier { supplier_id, percentage_increase }   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RepriceRequest::new() ← zero / < -100% rejected here                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ONE statement for every row of the supplier:                          │
//! │                                                                         │
//! │    new_cost  = round(cost × (1 + p))                                   │
//! │    new_price = round(new_cost × (1 + margin))                          │
//! │                                                                         │
//! │  Both columns are computed from the row's OLD cost in the same         │
//! │  statement, so no reader ever sees a new cost with an old price.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exact Integer Arithmetic
//! The statement evaluates the integer forms of [`almacen_core::pricing`],
//! split on the divisor so no intermediate product is larger than the
//! result:
//!
//! ```text
//! round(x × (D + k) / D) = (x / D) × (D + k) + ((x % D) × (D + k) + D/2) / D
//!
//!   cost:  D = 1000000, k = increase_ppm
//!   price: D = 10000,   k = margin_bps
//! ```
//!
//! Both sides are equal for `x ≥ 0`, so a repriced row matches
//! [`RepriceRequest::apply_to`] and `compute_sale_price` exactly. A value
//! that really leaves the 64-bit range fails the statement (PostgreSQL
//! raises `bigint out of range`; on SQLite the overflowed value turns REAL
//! and fails the column's `typeof` CHECK) and no row changes.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::backend::DbPool;
use crate::error::{DbError, DbResult, StoreError, StoreResult};
use almacen_core::pricing::{BPS_SCALE, PPM_SCALE};
use almacen_core::{CoreError, CostAndPrice, RepriceRequest};

/// `round(x × (d + k) / d)` over a non-negative integer column.
fn scaled_sql(x: &str, k: &str, d: i64) -> String {
    format!(
        "(({x}) / {d}) * ({d} + {k}) + ((({x}) % {d}) * ({d} + {k}) + {half}) / {d}",
        half = d / 2
    )
}

/// The single UPDATE behind [`PriceRepository::bulk_reprice`].
fn reprice_statement() -> String {
    let new_cost = scaled_sql("cost_cents", "$2", PPM_SCALE);
    let new_price = scaled_sql(&new_cost, "margin_bps", BPS_SCALE);
    format!(
        "UPDATE costs_and_prices \
         SET cost_cents = {new_cost}, sale_price_cents = {new_price}, updated_at = $3 \
         WHERE supplier_id = $1"
    )
}

/// Repository for cost and sale price rows.
#[derive(Debug, Clone)]
pub struct PriceRepository {
    pool: DbPool,
}

impl PriceRepository {
    /// Creates a new PriceRepository.
    pub fn new(pool: DbPool) -> Self {
        PriceRepository { pool }
    }

    /// Applies a percentage change to the cost of every product of a
    /// supplier and re-derives each sale price from its own margin.
    ///
    /// ## Returns
    /// * `Ok(n)` - Number of cost/price rows updated (zero for an unknown
    ///   supplier)
    /// * `Err(StoreError::Core(AmountOverflow))` - Some new cost or price
    ///   does not fit in i64 cents; nothing was changed
    pub async fn bulk_reprice(&self, request: &RepriceRequest) -> StoreResult<u64> {
        debug!(
            supplier_id = %request.supplier_id(),
            increase_ppm = request.increase_ppm(),
            "Repricing supplier"
        );

        let result = sqlx::query(&reprice_statement())
            .bind(request.supplier_id())
            .bind(request.increase_ppm())
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(DbError::from)
            .map_err(|e| match e {
                DbError::ConstraintViolation { message } => {
                    warn!(
                        supplier_id = %request.supplier_id(),
                        error = %message,
                        "Reprice rejected"
                    );
                    StoreError::Core(CoreError::AmountOverflow {
                        context: "bulk reprice".to_string(),
                    })
                }
                other => StoreError::Db(other),
            })?;

        let updated = result.rows_affected();
        info!(
            supplier_id = %request.supplier_id(),
            increase = %request.increase(),
            updated = updated,
            "Supplier repriced"
        );

        Ok(updated)
    }

    /// Gets the cost/price row of a product.
    pub async fn get(&self, product_id: &str) -> DbResult<Option<CostAndPrice>> {
        let row = sqlx::query_as::<_, CostAndPrice>(
            r#"
            SELECT product_id, supplier_id, cost_cents, margin_bps, sale_price_cents, updated_at
            FROM costs_and_prices
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Lists the cost/price rows of a supplier.
    pub async fn list_by_supplier(&self, supplier_id: &str) -> DbResult<Vec<CostAndPrice>> {
        let rows = sqlx::query_as::<_, CostAndPrice>(
            r#"
            SELECT product_id, supplier_id, cost_cents, margin_bps, sale_price_cents, updated_at
            FROM costs_and_prices
            WHERE supplier_id = $1
            ORDER BY product_id
            "#,
        )
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_shape() {
        let sql = reprice_statement();
        assert!(sql.starts_with("UPDATE costs_and_prices SET cost_cents = ((cost_cents) / 1000000)"));
        assert!(sql.ends_with("WHERE supplier_id = $1"));
        assert!(!sql.contains('?'));
    }
}

#[cfg(all(test, not(feature = "postgres")))]
mod sqlite_tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use almacen_core::pricing::compute_sale_price;
    use almacen_core::{Money, NewProduct, NewSupplier, Percentage, Quantity};
    use rust_decimal::Decimal;

    async fn setup() -> (Database, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let supplier = db
            .catalog()
            .create_supplier(&NewSupplier {
                trade_name: "Distribuidora Sur".to_string(),
                tax_id: None,
                phone: None,
            })
            .await
            .unwrap();
        let other = db
            .catalog()
            .create_supplier(&NewSupplier {
                trade_name: "Mayorista Norte".to_string(),
                tax_id: None,
                phone: None,
            })
            .await
            .unwrap();
        (db, supplier.id, other.id)
    }

    fn product(sku: &str, supplier_id: &str, cost_cents: i64, margin_bps: i64) -> NewProduct {
        NewProduct {
            name: format!("Product {sku}"),
            sku: sku.to_string(),
            stock_on_hand: Quantity::from_units(10),
            stock_minimum: Quantity::ZERO,
            category_id: None,
            unit_of_measure: "unit".to_string(),
            supplier_id: supplier_id.to_string(),
            cost: Money::from_cents(cost_cents),
            margin: Percentage::from_bps(margin_bps),
        }
    }

    fn percent(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_reprice_updates_cost_and_price() {
        let (db, supplier, _) = setup().await;
        let (p, _) = db
            .catalog()
            .create_product(&product("A-1", &supplier, 10000, 2000))
            .await
            .unwrap();

        let request = RepriceRequest::new(&supplier, Decimal::TEN).unwrap();
        assert_eq!(db.prices().bulk_reprice(&request).await.unwrap(), 1);

        let row = db.prices().get(&p.id).await.unwrap().unwrap();
        assert_eq!(row.cost_cents, 11000);
        assert_eq!(row.sale_price_cents, 13200);
    }

    #[tokio::test]
    async fn test_reprice_matches_core_math_and_scopes_supplier() {
        let (db, supplier, other) = setup().await;
        let mut created = Vec::new();
        for (sku, cost, margin) in [
            ("B-1", 1005, 500),
            ("B-2", 333, 3333),
            ("B-3", 999, -2500),
            ("B-4", 1_234_567_891, 1750),
        ] {
            let (p, _) = db
                .catalog()
                .create_product(&product(sku, &supplier, cost, margin))
                .await
                .unwrap();
            created.push((p.id, cost, margin));
        }
        let (untouched, before) = db
            .catalog()
            .create_product(&product("C-1", &other, 5000, 1000))
            .await
            .unwrap();

        let request = RepriceRequest::new(&supplier, percent("-7.5")).unwrap();
        assert_eq!(db.prices().bulk_reprice(&request).await.unwrap(), 4);

        for (id, cost, margin) in created {
            let row = db.prices().get(&id).await.unwrap().unwrap();
            let expected_cost = request.apply_to(Money::from_cents(cost)).unwrap();
            let expected_price =
                compute_sale_price(expected_cost, Percentage::from_bps(margin)).unwrap();
            assert_eq!(row.cost(), expected_cost, "{id}");
            assert_eq!(row.sale_price(), expected_price, "{id}");
        }

        let after = db.prices().get(&untouched.id).await.unwrap().unwrap();
        assert_eq!(after.cost_cents, before.cost_cents);
        assert_eq!(after.sale_price_cents, before.sale_price_cents);
        assert_eq!(db.prices().list_by_supplier(&supplier).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_tiny_increase_is_applied() {
        let (db, supplier, _) = setup().await;
        let (p, _) = db
            .catalog()
            .create_product(&product("T-1", &supplier, 1_000_000, 0))
            .await
            .unwrap();

        let request = RepriceRequest::new(&supplier, percent("0.004")).unwrap();
        assert_eq!(db.prices().bulk_reprice(&request).await.unwrap(), 1);

        let row = db.prices().get(&p.id).await.unwrap().unwrap();
        assert_eq!(row.cost_cents, 1_000_040);
        assert_eq!(row.sale_price_cents, 1_000_040);
    }

    #[tokio::test]
    async fn test_large_costs_stay_exact() {
        let (db, supplier, _) = setup().await;
        // 5e15 cents × 1.1 needs more than 64 bits if multiplied first
        let (p, _) = db
            .catalog()
            .create_product(&product("L-1", &supplier, 5_000_000_000_000_000, 0))
            .await
            .unwrap();

        let request = RepriceRequest::new(&supplier, Decimal::TEN).unwrap();
        db.prices().bulk_reprice(&request).await.unwrap();

        let row = db.prices().get(&p.id).await.unwrap().unwrap();
        assert_eq!(row.cost_cents, 5_500_000_000_000_000);
        assert_eq!(row.sale_price_cents, 5_500_000_000_000_000);
    }

    #[tokio::test]
    async fn test_overflow_fails_and_changes_nothing() {
        let (db, supplier, _) = setup().await;
        let (small, _) = db
            .catalog()
            .create_product(&product("O-1", &supplier, 100, 0))
            .await
            .unwrap();
        let (huge, before) = db
            .catalog()
            .create_product(&product("O-2", &supplier, 6_000_000_000_000_000_000, 0))
            .await
            .unwrap();

        let request = RepriceRequest::new(&supplier, Decimal::ONE_HUNDRED).unwrap();
        let err = db.prices().bulk_reprice(&request).await.unwrap_err();
        assert!(
            matches!(err, StoreError::Core(CoreError::AmountOverflow { .. })),
            "{err:?}"
        );

        let after = db.prices().get(&huge.id).await.unwrap().unwrap();
        assert_eq!(after.cost_cents, before.cost_cents);
        assert_eq!(after.sale_price_cents, before.sale_price_cents);
        assert_eq!(db.prices().get(&small.id).await.unwrap().unwrap().cost_cents, 100);
    }

    #[tokio::test]
    async fn test_reprice_unknown_supplier_updates_nothing() {
        let (db, _, _) = setup().await;
        let request = RepriceRequest::new("no-such-supplier", Decimal::from(5)).unwrap();
        assert_eq!(db.prices().bulk_reprice(&request).await.unwrap(), 0);
    }
}

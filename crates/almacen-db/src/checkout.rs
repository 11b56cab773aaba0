//! # Sale Processor
//!
//! Turns a list of requested lines into a committed sale, or into a list of
//! reasons why it cannot be sold, with nothing in between.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         submit_sale(items)                              │
//! │                                                                         │
//! │  validate_sale_lines(items)        ← before any connection is used     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN (UnitOfWork)                                                    │
//! │       │                                                                 │
//! │       ▼  for each line, ordered by product id                          │
//! │  try_decrement_stock(product, qty)  ← first statement is a WRITE       │
//! │  find_sale_candidate(product)       ← name, sku, price, stock left     │
//! │       │                                                                 │
//! │       ▼  for each line, in request order                               │
//! │       ├── taken   → checkout.accept()                                  │
//! │       └── refused ├── missing   → ProductNotFound                      │
//! │                   └── present   → InsufficientStock                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  checkout.finish()                                                     │
//! │       ├── problems → ROLLBACK → Err(CheckoutRejected([...]))           │
//! │       └── ok       → INSERT sale + details → COMMIT → SaleReceipt      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The decrement is conditional on `stock_on_hand >= quantity`, so stock can
//! never go below zero, and it is the first statement touching a product,
//! so no stock is read before it is locked.
//!
//! - SQLite: the first decrement takes the database write lock and holds it
//!   until commit. Sales run one after the other; the second sees the stock
//!   left by the first.
//! - PostgreSQL: each decrement locks one product row until commit. Sales on
//!   disjoint products proceed in parallel; sales sharing a product queue on
//!   that row. Rows are always locked in product id order, so two sales
//!   sharing several products cannot deadlock.
//!
//! Lines of the same product keep their request order, so repeated lines
//! draw on the stock left by the earlier ones.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::pool::Database;
use crate::repository::product::{find_sale_candidate, try_decrement_stock, SaleCandidate};
use crate::repository::sale::{insert_detail, insert_sale};
use almacen_core::validation::validate_sale_lines;
use almacen_core::{
    Checkout, CoreError, LineProblem, Money, PricedLine, Sale, SaleDetail, SaleLineRequest,
    SaleReceipt, SaleWithDetails,
};

/// Processes sales against the database.
#[derive(Debug, Clone)]
pub struct SaleProcessor {
    db: Database,
}

impl SaleProcessor {
    pub fn new(db: Database) -> Self {
        SaleProcessor { db }
    }

    /// Submits a sale as one all-or-nothing unit.
    ///
    /// ## Returns
    /// * `Ok(SaleReceipt)` - Sale committed, stock decremented
    /// * `Err(StoreError::Core(CoreError::Validation(..)))` - Malformed request
    /// * `Err(StoreError::Core(CoreError::CheckoutRejected(..)))` - One or more
    ///   lines cannot be fulfilled; every problem is listed and nothing changed
    /// * `Err(StoreError::Db(..))` - Storage failure; nothing changed
    pub async fn submit_sale(&self, items: &[SaleLineRequest]) -> StoreResult<SaleReceipt> {
        validate_sale_lines(items)?;

        let now = Utc::now();
        let mut uow = self.db.begin().await?;

        let mut outcomes: Vec<Option<(bool, Option<SaleCandidate>)>> = vec![None; items.len()];
        for index in lock_order(items) {
            let item = &items[index];
            let product_id = item.product_id.trim();
            let taken = try_decrement_stock(uow.conn(), product_id, item.quantity, now).await?;
            let candidate = find_sale_candidate(uow.conn(), product_id).await?;
            outcomes[index] = Some((taken, candidate));
        }

        let mut checkout = Checkout::new();
        for (line_no, (item, outcome)) in items.iter().zip(outcomes).enumerate() {
            let product_id = item.product_id.trim();
            let (taken, candidate) = outcome.unwrap_or((false, None));

            match (taken, candidate) {
                (_, None) => checkout.reject(LineProblem::ProductNotFound {
                    product_id: product_id.to_string(),
                }),
                (false, Some(product)) => checkout.reject(LineProblem::InsufficientStock {
                    product_id: product.id,
                    name: product.name,
                    available: product.stock_on_hand,
                    requested: item.quantity,
                }),
                (true, Some(product)) => match product.sale_price_cents {
                    Some(cents) => checkout.accept(PricedLine {
                        line_no: line_no as i64,
                        product_id: product.id,
                        name: product.name,
                        sku: product.sku,
                        quantity: item.quantity,
                        unit_price: Money::from_cents(cents),
                    }),
                    None => checkout.reject(LineProblem::MissingPrice {
                        product_id: product.id,
                        name: product.name,
                    }),
                },
            }
        }

        let summary = match checkout.finish() {
            Ok(summary) => summary,
            Err(err) => {
                uow.rollback().await?;
                if let CoreError::CheckoutRejected(problems) = &err {
                    warn!(problems = problems.len(), "Sale rejected, stock untouched");
                }
                return Err(StoreError::Core(err));
            }
        };

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            total_cents: summary.total.cents(),
        };
        insert_sale(uow.conn(), &sale).await?;

        for line in &summary.lines {
            let detail = SaleDetail {
                id: Uuid::new_v4().to_string(),
                sale_id: sale.id.clone(),
                product_id: line.product_id.clone(),
                line_no: line.line_no,
                sku_snapshot: line.sku.clone(),
                name_snapshot: line.name.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price.cents(),
            };
            insert_detail(uow.conn(), &detail).await?;
        }

        uow.commit().await?;

        info!(
            sale_id = %sale.id,
            total = %sale.total(),
            lines = summary.lines.len(),
            "Sale committed"
        );

        Ok(SaleReceipt {
            sale,
            items_sold: summary.lines.len(),
        })
    }

    /// Reads a committed sale with its lines in request order.
    pub async fn get_sale_detail(&self, sale_id: &str) -> StoreResult<SaleWithDetails> {
        debug!(sale_id = %sale_id, "Loading sale detail");

        let sales = self.db.sales();
        let sale = sales
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;
        let details = sales.get_details(sale_id).await?;

        Ok(SaleWithDetails { sale, details })
    }
}

/// Line indexes ordered by product id, ties kept in request order.
fn lock_order(items: &[SaleLineRequest]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&i| items[i].product_id.trim());
    order
}

// =============================================================================
// Unit Tests
// =============================================================================


#[cfg(all(test, not(feature = "postgres")))]
mod sqlite_tests {
    use super::*;
    use crate::pool::DbConfig;
    use almacen_core::{
        NewProduct, NewSupplier, Percentage, Quantity, RepriceRequest, ValidationError,
    };
    use rust_decimal::Decimal;

    struct Fixture {
        db: Database,
        supplier_id: String,
    }

    impl Fixture {
        async fn new() -> Self {
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
            Fixture {
                db,
                supplier_id: supplier.id,
            }
        }

        /// Creates a product priced at `price_cents` (zero margin).
        async fn product(&self, sku: &str, stock: i64, price_cents: i64) -> String {
            self.product_with_stock(sku, Quantity::from_units(stock), price_cents)
                .await
        }

        async fn product_with_stock(&self, sku: &str, stock: Quantity, price_cents: i64) -> String {
            let (product, _) = self
                .db
                .catalog()
                .create_product(&NewProduct {
                    name: format!("Product {sku}"),
                    sku: sku.to_string(),
                    stock_on_hand: stock,
                    stock_minimum: Quantity::ZERO,
                    category_id: None,
                    unit_of_measure: "unit".to_string(),
                    supplier_id: self.supplier_id.clone(),
                    cost: Money::from_cents(price_cents),
                    margin: Percentage::from_bps(0),
                })
                .await
                .unwrap();
            product.id
        }

        async fn stock(&self, id: &str) -> Quantity {
            self.db
                .catalog()
                .get_product(id)
                .await
                .unwrap()
                .unwrap()
                .stock_on_hand
        }
    }

    fn units(n: i64) -> Quantity {
        Quantity::from_units(n)
    }

    fn problems(err: StoreError) -> Vec<LineProblem> {
        match err {
            StoreError::Core(CoreError::CheckoutRejected(problems)) => problems,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_single_line_sale() {
        let fx = Fixture::new().await;
        let p = fx.product("A", 10, 1000).await;

        let receipt = fx
            .db
            .processor()
            .submit_sale(&[SaleLineRequest::new(&p, 3)])
            .await
            .unwrap();

        assert_eq!(receipt.sale.total_cents, 3000);
        assert_eq!(receipt.items_sold, 1);
        assert_eq!(fx.stock(&p).await, units(7));
    }

    #[tokio::test]
    async fn test_multi_line_sale_records_details_in_order() {
        let fx = Fixture::new().await;
        let a = fx.product("A", 10, 250).await;
        let b = fx.product("B", 10, 1099).await;

        let receipt = fx
            .db
            .processor()
            .submit_sale(&[SaleLineRequest::new(&b, 2), SaleLineRequest::new(&a, 4)])
            .await
            .unwrap();
        assert_eq!(receipt.sale.total_cents, 2 * 1099 + 4 * 250);

        let detail = fx.db.processor().get_sale_detail(&receipt.sale.id).await.unwrap();
        assert_eq!(detail.details.len(), 2);
        assert_eq!(detail.details[0].sku_snapshot, "B");
        assert_eq!(detail.details[0].unit_price_cents, 1099);
        assert_eq!(detail.details[1].name_snapshot, "Product A");
        let sum: i64 = detail
            .details
            .iter()
            .map(|d| d.quantity.milli() / 1000 * d.unit_price_cents)
            .sum();
        assert_eq!(sum, detail.sale.total_cents);
    }

    #[tokio::test]
    async fn test_insufficient_stock_changes_nothing() {
        let fx = Fixture::new().await;
        let p = fx.product("A", 5, 1000).await;

        let err = fx
            .db
            .processor()
            .submit_sale(&[SaleLineRequest::new(&p, 6)])
            .await
            .unwrap_err();

        assert_eq!(
            problems(err),
            vec![LineProblem::InsufficientStock {
                product_id: p.clone(),
                name: "Product A".to_string(),
                available: units(5),
                requested: units(6),
            }]
        );
        assert_eq!(fx.stock(&p).await, units(5));
        assert_eq!(fx.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_one_bad_line_rejects_all_and_reports_every_problem() {
        let fx = Fixture::new().await;
        let good = fx.product("A", 10, 1000).await;
        let short = fx.product("B", 1, 1000).await;

        let err = fx
            .db
            .processor()
            .submit_sale(&[
                SaleLineRequest::new(&good, 2),
                SaleLineRequest::new("ghost", 1),
                SaleLineRequest::new(&short, 3),
            ])
            .await
            .unwrap_err();

        let problems = problems(err);
        assert_eq!(problems.len(), 2);
        assert_eq!(
            problems[0],
            LineProblem::ProductNotFound {
                product_id: "ghost".to_string()
            }
        );
        assert_eq!(problems[1].product_id(), short);
        assert_eq!(fx.stock(&good).await, units(10));
        assert_eq!(fx.stock(&short).await, units(1));
    }

    #[tokio::test]
    async fn test_repeated_lines_share_stock() {
        let fx = Fixture::new().await;
        let p = fx.product("A", 5, 100).await;

        let err = fx
            .db
            .processor()
            .submit_sale(&[SaleLineRequest::new(&p, 3), SaleLineRequest::new(&p, 3)])
            .await
            .unwrap_err();
        assert_eq!(
            problems(err),
            vec![LineProblem::InsufficientStock {
                product_id: p.clone(),
                name: "Product A".to_string(),
                available: units(2),
                requested: units(3),
            }]
        );
        assert_eq!(fx.stock(&p).await, units(5));

        fx.db
            .processor()
            .submit_sale(&[SaleLineRequest::new(&p, 3), SaleLineRequest::new(&p, 2)])
            .await
            .unwrap();
        assert_eq!(fx.stock(&p).await, Quantity::ZERO);
    }

    #[tokio::test]
    async fn test_missing_price_is_a_line_problem() {
        let fx = Fixture::new().await;
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO products (id, name, sku, name_key, sku_key, stock_on_hand, stock_minimum, unit_of_measure, created_at, updated_at)
             VALUES ('bare', 'Unpriced', 'BARE', 'unpriced', 'bare', 3000, 0, 'unit', $1, $1)",
        )
        .bind(now)
        .execute(fx.db.pool())
        .await
        .unwrap();

        let err = fx
            .db
            .processor()
            .submit_sale(&[SaleLineRequest::new("bare", 1)])
            .await
            .unwrap_err();
        assert!(matches!(problems(err)[0], LineProblem::MissingPrice { .. }));
        assert_eq!(fx.stock("bare").await, units(3));
    }

    #[tokio::test]
    async fn test_validation_happens_first() {
        let fx = Fixture::new().await;
        let err = fx.db.processor().submit_sale(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::Validation(ValidationError::Empty { .. }))
        ));
    }

    #[tokio::test]
    async fn test_captured_price_survives_reprice() {
        let fx = Fixture::new().await;
        let p = fx.product("A", 10, 10000).await;

        let receipt = fx
            .db
            .processor()
            .submit_sale(&[SaleLineRequest::new(&p, 1)])
            .await
            .unwrap();

        let request = RepriceRequest::new(&fx.supplier_id, Decimal::from(50)).unwrap();
        fx.db.prices().bulk_reprice(&request).await.unwrap();
        assert_eq!(
            fx.db.prices().get(&p).await.unwrap().unwrap().sale_price_cents,
            15000
        );

        let detail = fx.db.processor().get_sale_detail(&receipt.sale.id).await.unwrap();
        assert_eq!(detail.details[0].unit_price_cents, 10000);
        assert_eq!(detail.sale.total_cents, 10000);
    }

    #[tokio::test]
    async fn test_unknown_sale_is_not_found() {
        let fx = Fixture::new().await;
        let err = fx.db.processor().get_sale_detail("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::SaleNotFound(_))));
    }

    #[tokio::test]
    async fn test_large_whole_quantities_are_accepted() {
        let fx = Fixture::new().await;
        let p = fx.product("BULK", 20_000, 5).await;

        let receipt = fx
            .db
            .processor()
            .submit_sale(&[SaleLineRequest::new(&p, 10_000)])
            .await
            .unwrap();

        assert_eq!(receipt.sale.total_cents, 50_000);
        assert_eq!(fx.stock(&p).await, units(10_000));
    }

    #[tokio::test]
    async fn test_fractional_sale_rounds_total_once() {
        let fx = Fixture::new().await;
        let cheese = fx
            .product_with_stock("QUESO", Quantity::from_milli(2_000), 1099)
            .await;
        let ham = fx.product("JAMON", 5, 300).await;

        let receipt = fx
            .db
            .processor()
            .submit_sale(&[
                SaleLineRequest::with_quantity(&cheese, Quantity::from_milli(1_500)),
                SaleLineRequest::with_quantity(&ham, Quantity::from_milli(333)),
            ])
            .await
            .unwrap();

        // 1.5 × 10.99 + 0.333 × 3.00 = 16.485 + 0.999 = 17.484
        assert_eq!(receipt.sale.total_cents, 1748);
        assert_eq!(fx.stock(&cheese).await, Quantity::from_milli(500));
        assert_eq!(fx.stock(&ham).await, Quantity::from_milli(4_667));

        let detail = fx.db.processor().get_sale_detail(&receipt.sale.id).await.unwrap();
        assert_eq!(detail.details[0].quantity.to_string(), "1.5");
        assert_eq!(detail.details[1].quantity.to_string(), "0.333");
    }

    #[tokio::test]
    async fn test_problems_follow_request_order_not_lock_order() {
        let fx = Fixture::new().await;
        let z = fx.product("Z", 1, 100).await;

        let err = fx
            .db
            .processor()
            .submit_sale(&[
                SaleLineRequest::new("zzz-ghost", 1),
                SaleLineRequest::new(&z, 2),
                SaleLineRequest::new("aaa-ghost", 1),
            ])
            .await
            .unwrap_err();

        let ids: Vec<_> = problems(err)
            .iter()
            .map(|p| p.product_id().to_string())
            .collect();
        assert_eq!(ids, vec!["zzz-ghost".to_string(), z, "aaa-ghost".to_string()]);
    }
}

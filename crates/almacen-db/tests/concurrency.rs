//! Concurrent checkouts against a file-backed SQLite database.
//!
//! In-memory databases are limited to one connection, so these tests use a
//! temporary file and a real pool to let sales race for the same stock.
//! The PostgreSQL counterpart lives in `pg_concurrency.rs`.

#![cfg(not(feature = "postgres"))]

use std::time::Duration;

use almacen_core::{
    CoreError, LineProblem, Money, NewProduct, NewSupplier, Percentage, Quantity, SaleLineRequest,
};
use almacen_db::{Database, DbConfig, StoreError};
use tempfile::TempDir;

async fn open(dir: &TempDir) -> Database {
    let config = DbConfig::new(dir.path().join("almacen.db").to_string_lossy())
        .max_connections(8)
        .busy_timeout(Duration::from_secs(10));
    Database::new(config).await.unwrap()
}

async fn product_with_stock(db: &Database, sku: &str, stock: i64) -> String {
    let supplier = db
        .catalog()
        .create_supplier(&NewSupplier {
            trade_name: format!("Supplier {sku}"),
            tax_id: None,
            phone: None,
        })
        .await
        .unwrap();
    let (product, _) = db
        .catalog()
        .create_product(&NewProduct {
            name: format!("Product {sku}"),
            sku: sku.to_string(),
            stock_on_hand: Quantity::from_units(stock),
            stock_minimum: Quantity::ZERO,
            category_id: None,
            unit_of_measure: "unit".to_string(),
            supplier_id: supplier.id,
            cost: Money::from_cents(1000),
            margin: Percentage::from_bps(0),
        })
        .await
        .unwrap();
    product.id
}

async fn stock(db: &Database, id: &str) -> Quantity {
    db.catalog().get_product(id).await.unwrap().unwrap().stock_on_hand
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_sales_exceeding_stock_exactly_one_wins() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;
    let p = product_with_stock(&db, "RACE", 5).await;

    let a = tokio::spawn({
        let db = db.clone();
        let p = p.clone();
        async move { db.processor().submit_sale(&[SaleLineRequest::new(p, 3)]).await }
    });
    let b = tokio::spawn({
        let db = db.clone();
        let p = p.clone();
        async move { db.processor().submit_sale(&[SaleLineRequest::new(p, 3)]).await }
    });

    let results = [a.await.unwrap(), b.await.unwrap()];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "results: {results:?}");

    let loser = results.into_iter().find_map(Result::err).unwrap();
    match loser {
        StoreError::Core(CoreError::CheckoutRejected(problems)) => {
            assert_eq!(
                problems,
                vec![LineProblem::InsufficientStock {
                    product_id: p.clone(),
                    name: "Product RACE".to_string(),
                    available: Quantity::from_units(2),
                    requested: Quantity::from_units(3),
                }]
            );
        }
        other => panic!("expected stock rejection, got {other:?}"),
    }

    assert_eq!(stock(&db, &p).await, Quantity::from_units(2));
    assert_eq!(db.sales().count().await.unwrap(), 1);
    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_single_unit_sales_never_overdraw() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;
    let p = product_with_stock(&db, "HOT", 10).await;

    let mut handles = Vec::new();
    for _ in 0..25 {
        let db = db.clone();
        let p = p.clone();
        handles.push(tokio::spawn(async move {
            db.processor().submit_sale(&[SaleLineRequest::new(p, 1)]).await
        }));
    }

    let mut committed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed += 1,
            Err(StoreError::Core(CoreError::CheckoutRejected(_))) => {}
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
    }

    assert_eq!(committed, 10);
    assert_eq!(stock(&db, &p).await, Quantity::ZERO);
    assert_eq!(db.sales().count().await.unwrap(), 10);
    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sales_on_different_products_all_commit() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;
    let a = product_with_stock(&db, "A", 4).await;
    let b = product_with_stock(&db, "B", 4).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let db = db.clone();
        let p = if i % 2 == 0 { a.clone() } else { b.clone() };
        handles.push(tokio::spawn(async move {
            db.processor().submit_sale(&[SaleLineRequest::new(p, 1)]).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(stock(&db, &a).await, Quantity::ZERO);
    assert_eq!(stock(&db, &b).await, Quantity::ZERO);
    db.close().await;
}

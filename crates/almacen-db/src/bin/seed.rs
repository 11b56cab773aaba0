//! # Seed Data Generator
//!
//! Populates the database with suppliers, categories and products for
//! development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p almacen-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p almacen-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p almacen-db --bin seed -- --db ./data/almacen.db
//!
//! # PostgreSQL
//! cargo run -p almacen-db --features postgres --bin seed -- --db postgres://localhost/almacen
//! ```
//!
//! ## Generated Data
//! - One supplier per category, so bulk repricing can be tried per supplier
//! - Products named `{item} {size}` with SKU `{CAT}-{ITEM}-{NNN}`
//! - Cost 0.50 - 20.49, margin 15% - 59%, stock 0 - 100
//! - Cheese and butter are sold by weight (kg, stock to the gram)

use anyhow::Context;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use almacen_core::{Money, NewProduct, NewSupplier, Percentage, Quantity};
use almacen_db::{Database, DbConfig, DbError, StoreError};

/// (category, SKU prefix, supplier, items)
const CATALOG: &[(&str, &str, &str, &[&str])] = &[
    (
        "Bebidas",
        "BEB",
        "Distribuidora Sur",
        &[
            "Agua Mineral",
            "Agua Saborizada",
            "Gaseosa Cola",
            "Gaseosa Lima",
            "Jugo de Naranja",
            "Soda",
            "Cerveza Rubia",
            "Vino Tinto",
        ],
    ),
    (
        "Almacen",
        "ALM",
        "Mayorista Norte",
        &[
            "Yerba Mate",
            "Azucar",
            "Harina 000",
            "Fideos Tirabuzon",
            "Arroz Largo Fino",
            "Aceite de Girasol",
            "Cafe Molido",
            "Te en Saquitos",
            "Dulce de Leche",
        ],
    ),
    (
        "Limpieza",
        "LIM",
        "Quimica Oeste",
        &[
            "Lavandina",
            "Detergente",
            "Jabon en Polvo",
            "Suavizante",
            "Limpiador de Pisos",
        ],
    ),
    (
        "Lacteos",
        "LAC",
        "Tambo del Este",
        &["Leche Entera", "Yogur Bebible", "Queso Cremoso", "Manteca", "Crema"],
    ),
];

const SIZES: &[&str] = &["Chico", "Mediano", "Grande", "Familiar"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = "./data/almacen.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                let value = args.get(i + 1).context("--count needs a value")?;
                count = value.parse().context("--count must be a number")?;
                i += 1;
            }
            "--db" | "-d" => {
                db_path = args.get(i + 1).context("--db needs a path or URL")?.clone();
                i += 1;
            }
            "--help" | "-h" => {
                println!("Almacen POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path or URL (default: ./data/almacen.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let config = DbConfig::new(db_path);
    info!(db = %config.redacted(), products = count, "Seeding database");

    let db = Database::new(config)
        .await
        .context("opening database")?;

    let existing = db.catalog().count_products().await?;
    if existing > 0 {
        warn!(
            existing,
            "Database already has products, skipping seed. Empty it to regenerate."
        );
        db.close().await;
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0usize;
    let mut seq = 0usize;

    'outer: for (category_name, prefix, supplier_name, items) in CATALOG {
        let category = db.catalog().create_category(category_name).await?;
        let supplier = db
            .catalog()
            .create_supplier(&NewSupplier {
                trade_name: supplier_name.to_string(),
                tax_id: Some(format!("30-{:08}-{}", 10_000_000 + seq, seq % 10)),
                phone: None,
            })
            .await?;

        for item in items.iter() {
            for size in SIZES {
                if generated >= count {
                    break 'outer;
                }
                seq += 1;

                let product = generate_product(prefix, item, size, seq, &category.id, &supplier.id);
                match db.catalog().create_product(&product).await {
                    Ok(_) => generated += 1,
                    Err(StoreError::Db(DbError::UniqueViolation { value, .. })) => {
                        warn!(sku = %value, "Duplicate SKU, skipped");
                    }
                    Err(e) => return Err(e).context(format!("inserting {}", product.sku)),
                }
            }
        }
    }

    info!(
        generated,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Products generated"
    );

    let hits = db.catalog().search_products("yerba").await?;
    info!(hits = hits.len(), "Search 'yerba'");

    db.close().await;
    info!("Seed complete");
    Ok(())
}

/// Generates a single product with deterministic pseudo-random data.
fn generate_product(
    prefix: &str,
    item: &str,
    size: &str,
    seq: usize,
    category_id: &str,
    supplier_id: &str,
) -> NewProduct {
    let code: String = item
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();

    let by_weight = item.starts_with("Queso") || item.starts_with("Manteca");
    let (unit_of_measure, stock_on_hand) = if by_weight {
        ("kg", Quantity::from_milli((seq * 3_719 % 25_000) as i64))
    } else {
        ("unit", Quantity::from_units((seq * 37 % 101) as i64))
    };

    NewProduct {
        name: format!("{item} {size}"),
        sku: format!("{prefix}-{code}-{seq:03}"),
        stock_on_hand,
        stock_minimum: Quantity::from_units(5),
        category_id: Some(category_id.to_string()),
        unit_of_measure: unit_of_measure.to_string(),
        supplier_id: supplier_id.to_string(),
        cost: Money::from_cents(50 + (seq * 173 % 2000) as i64),
        margin: Percentage::from_bps(1500 + (seq * 7 % 45) as i64 * 100),
    }
}

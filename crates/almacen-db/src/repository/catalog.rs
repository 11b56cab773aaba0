//! # Catalog Repository
//!
//! Suppliers, categories and products with their initial cost record.
//!
//! ## Product Creation
//! ```text
//! create_product(NewProduct)
//!      │
//!      ├── validate (name, sku, unit, stock, cost, margin)
//!      ├── compute_sale_price(cost, margin)
//!      │
//!      ▼  one unit of work
//!  INSERT products          ┐
//!  INSERT costs_and_prices  ┘ both or neither
//! ```
//!
//! ## Search
//! Case-insensitive substring match on name or SKU, ordered by name, at most
//! [`SEARCH_LIMIT`] rows. Only products with a price are listed, since a
//! product without one cannot be sold.
//!
//! Case folding happens in Rust ([`search_key`]), not in SQL: SQLite's
//! `LOWER()` only folds ASCII. Each product stores the folded forms of its
//! name and SKU (`name_key`, `sku_key`) and the query is folded the same
//! way, so "ÑANDÚ" finds "Ñandú Ácido" on either engine.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::DbPool;
use crate::error::{DbError, DbResult, StoreResult};
use crate::unit_of_work::UnitOfWork;
use almacen_core::pricing::compute_sale_price;
use almacen_core::validation::{
    validate_category_name, validate_cost_cents, validate_margin_bps, validate_product_name,
    search_key, validate_search_query, validate_sku, validate_stock_level, validate_trade_name,
    validate_unit_of_measure,
};
use almacen_core::{
    Category, CostAndPrice, NewProduct, NewSupplier, Product, ProductListing, Supplier, SEARCH_LIMIT,
};

/// Repository for catalog data.
///
/// ## Usage
/// ```rust,ignore
/// let supplier = db.catalog().create_supplier(&new_supplier).await?;
/// let results = db.catalog().search_products("yerba").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: DbPool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: DbPool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    /// Registers a supplier. The trade name is required.
    pub async fn create_supplier(&self, input: &NewSupplier) -> StoreResult<Supplier> {
        validate_trade_name(&input.trade_name)?;

        let supplier = Supplier {
            id: Uuid::new_v4().to_string(),
            trade_name: input.trade_name.trim().to_string(),
            tax_id: non_blank(input.tax_id.as_deref()),
            phone: non_blank(input.phone.as_deref()),
            created_at: Utc::now(),
        };

        debug!(id = %supplier.id, trade_name = %supplier.trade_name, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (id, trade_name, tax_id, phone, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.trade_name)
        .bind(&supplier.tax_id)
        .bind(&supplier.phone)
        .bind(supplier.created_at)
        .execute(&self.pool)
        .await?;

        info!(id = %supplier.id, "Supplier created");
        Ok(supplier)
    }

    /// Lists suppliers ordered by trade name.
    pub async fn list_suppliers(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, trade_name, tax_id, phone, created_at
            FROM suppliers
            ORDER BY trade_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    /// Gets a supplier by ID.
    pub async fn get_supplier(&self, id: &str) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT id, trade_name, tax_id, phone, created_at FROM suppliers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Creates a category. Names are unique.
    pub async fn create_category(&self, name: &str) -> StoreResult<Category> {
        validate_category_name(name)?;

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
        };

        sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2)")
            .bind(&category.id)
            .bind(&category.name)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("category", &category.name),
                other => other,
            })?;

        info!(id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Lists categories ordered by name.
    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Creates a product together with its cost/price row.
    ///
    /// ## Returns
    /// * `Ok((Product, CostAndPrice))` - Both rows committed
    /// * `Err(StoreError::Core(..))` - Invalid input
    /// * `Err(StoreError::Db(UniqueViolation))` - SKU already exists
    /// * `Err(StoreError::Db(ForeignKeyViolation))` - Unknown supplier or category
    pub async fn create_product(&self, input: &NewProduct) -> StoreResult<(Product, CostAndPrice)> {
        validate_product_name(&input.name)?;
        validate_sku(&input.sku)?;
        validate_unit_of_measure(&input.unit_of_measure)?;
        validate_stock_level("stock_on_hand", input.stock_on_hand)?;
        validate_stock_level("stock_minimum", input.stock_minimum)?;
        validate_cost_cents(input.cost.cents())?;
        validate_margin_bps(input.margin.bps())?;
        if input.supplier_id.trim().is_empty() {
            return Err(almacen_core::ValidationError::Required {
                field: "supplier_id".to_string(),
            }
            .into());
        }

        let sale_price = compute_sale_price(input.cost, input.margin)?;
        let now = Utc::now();

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            sku: input.sku.trim().to_string(),
            stock_on_hand: input.stock_on_hand,
            stock_minimum: input.stock_minimum,
            category_id: non_blank(input.category_id.as_deref()),
            unit_of_measure: input.unit_of_measure.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        let price = CostAndPrice {
            product_id: product.id.clone(),
            supplier_id: input.supplier_id.trim().to_string(),
            cost_cents: input.cost.cents(),
            margin_bps: input.margin.bps(),
            sale_price_cents: sale_price.cents(),
            updated_at: now,
        };

        debug!(sku = %product.sku, sale_price = %sale_price, "Inserting product");

        let mut uow = UnitOfWork::begin(&self.pool).await?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, sku, name_key, sku_key, stock_on_hand, stock_minimum,
                category_id, unit_of_measure, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7,
                $8, $9, $10, $11
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(search_key(&product.name))
        .bind(search_key(&product.sku))
        .bind(product.stock_on_hand)
        .bind(product.stock_minimum)
        .bind(&product.category_id)
        .bind(&product.unit_of_measure)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(uow.conn())
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("sku", &product.sku),
            other => other,
        })?;

        sqlx::query(
            r#"
            INSERT INTO costs_and_prices (
                product_id, supplier_id, cost_cents, margin_bps, sale_price_cents, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&price.product_id)
        .bind(&price.supplier_id)
        .bind(price.cost_cents)
        .bind(price.margin_bps)
        .bind(price.sale_price_cents)
        .bind(price.updated_at)
        .execute(uow.conn())
        .await?;

        uow.commit().await?;

        info!(id = %product.id, sku = %product.sku, "Product created");
        Ok((product, price))
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, sku, stock_on_hand, stock_minimum,
                category_id, unit_of_measure, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Searches products by name or SKU.
    ///
    /// An empty query lists the first [`SEARCH_LIMIT`] products by name.
    pub async fn search_products(&self, query: &str) -> StoreResult<Vec<ProductListing>> {
        let query = validate_search_query(query)?;
        let pattern = format!("%{}%", escape_like(&search_key(&query)));

        debug!(query = %query, "Searching products");

        let products = sqlx::query_as::<_, ProductListing>(
            r#"
            SELECT
                p.id,
                p.name,
                p.sku,
                p.stock_on_hand,
                p.unit_of_measure,
                cp.sale_price_cents
            FROM products p
            INNER JOIN costs_and_prices cp ON cp.product_id = p.id
            WHERE p.name_key LIKE $1 ESCAPE '\'
               OR p.sku_key LIKE $1 ESCAPE '\'
            ORDER BY p.name
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Counts products (for diagnostics and the seed binary).
    pub async fn count_products(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================

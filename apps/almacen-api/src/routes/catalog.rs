//! Supplier, category and product endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use almacen_core::{
    Category, Money, NewProduct, NewSupplier, Percentage, ProductListing, Quantity, Supplier,
    ValidationError,
};

use crate::error::ApiResult;
use crate::AppState;

// =============================================================================
// Suppliers & Categories
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SupplierCreated {
    pub message: String,
    pub supplier: Supplier,
}

pub async fn create_supplier(
    State(state): State<AppState>,
    payload: Result<Json<NewSupplier>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SupplierCreated>)> {
    let Json(input) = payload?;
    let supplier = state.db.catalog().create_supplier(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(SupplierCreated {
            message: "Supplier registered".to_string(),
            supplier,
        }),
    ))
}

pub async fn list_suppliers(State(state): State<AppState>) -> ApiResult<Json<Vec<Supplier>>> {
    Ok(Json(state.db.catalog().list_suppliers().await?))
}

#[derive(Debug, Deserialize)]
pub struct NewCategoryBody {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryCreated {
    pub message: String,
    pub category: Category,
}

pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<NewCategoryBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CategoryCreated>)> {
    let Json(body) = payload?;
    let category = state.db.catalog().create_category(&body.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryCreated {
            message: "Category created".to_string(),
            category,
        }),
    ))
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.catalog().list_categories().await?))
}

// =============================================================================
// Products
// =============================================================================

/// Product creation input. `cost` and `margin` accept numbers or numeric
/// strings; `margin` is a percentage (`20` = 20%).
#[derive(Debug, Deserialize)]
pub struct NewProductBody {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub stock_on_hand: Quantity,
    #[serde(default)]
    pub stock_minimum: Quantity,
    pub category_id: Option<String>,
    pub unit_of_measure: String,
    pub supplier_id: String,
    pub cost: Decimal,
    pub margin: Decimal,
}

impl NewProductBody {
    fn into_new_product(self) -> Result<NewProduct, ValidationError> {
        let cost = Money::from_decimal(self.cost).ok_or_else(|| ValidationError::InvalidFormat {
            field: "cost".to_string(),
            reason: "out of range".to_string(),
        })?;
        let margin =
            Percentage::from_decimal(self.margin).ok_or_else(|| ValidationError::InvalidFormat {
                field: "margin".to_string(),
                reason: "out of range".to_string(),
            })?;

        Ok(NewProduct {
            name: self.name,
            sku: self.sku,
            stock_on_hand: self.stock_on_hand,
            stock_minimum: self.stock_minimum,
            category_id: self.category_id,
            unit_of_measure: self.unit_of_measure,
            supplier_id: self.supplier_id,
            cost,
            margin,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProductRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProductCreated {
    pub message: String,
    pub product: ProductRef,
    pub sale_price: String,
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<NewProductBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProductCreated>)> {
    let Json(body) = payload?;
    let input = body.into_new_product()?;

    let (product, price) = state.db.catalog().create_product(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductCreated {
            message: "Product created".to_string(),
            product: ProductRef {
                id: product.id,
                name: product.name,
            },
            sale_price: price.sale_price().to_string(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct ListingView {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub stock_on_hand: Quantity,
    pub unit_of_measure: String,
    pub sale_price: String,
}

impl From<ProductListing> for ListingView {
    fn from(listing: ProductListing) -> Self {
        let sale_price = listing.sale_price().to_string();
        ListingView {
            id: listing.id,
            name: listing.name,
            sku: listing.sku,
            stock_on_hand: listing.stock_on_hand,
            unit_of_measure: listing.unit_of_measure,
            sale_price,
        }
    }
}

pub async fn search_products(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<Vec<ListingView>>> {
    let Query(params) = params?;
    let hits = state.db.catalog().search_products(&params.q).await?;

    Ok(Json(hits.into_iter().map(ListingView::from).collect()))
}

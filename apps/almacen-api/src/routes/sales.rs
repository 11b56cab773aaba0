//! Sale endpoints.
//!
//! ```text
//! POST /sales        { items: [{ product_id, quantity }] }
//!                    → 201 { sale: { id, date, total }, items_sold }
//! GET  /sales/{id}   → 200 { sale: { id, date, total },
//!                            detail: [{ quantity, unit_price, product_name, sku }] }
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use almacen_core::{Quantity, Sale, SaleDetail, SaleLineRequest};

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitSaleBody {
    pub items: Vec<SaleLineRequest>,
}

/// Sale header as returned to clients. Money is a two-place decimal string.
#[derive(Debug, Serialize)]
pub struct SaleView {
    pub id: String,
    pub date: DateTime<Utc>,
    pub total: String,
}

impl From<&Sale> for SaleView {
    fn from(sale: &Sale) -> Self {
        SaleView {
            id: sale.id.clone(),
            date: sale.created_at,
            total: sale.total().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaleCreated {
    pub sale: SaleView,
    pub items_sold: usize,
}

#[derive(Debug, Serialize)]
pub struct DetailLine {
    pub quantity: Quantity,
    pub unit_price: String,
    pub product_name: String,
    pub sku: String,
}

impl From<&SaleDetail> for DetailLine {
    fn from(detail: &SaleDetail) -> Self {
        DetailLine {
            quantity: detail.quantity,
            unit_price: detail.unit_price().to_string(),
            product_name: detail.name_snapshot.clone(),
            sku: detail.sku_snapshot.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaleDetailResponse {
    pub sale: SaleView,
    pub detail: Vec<DetailLine>,
}

/// Records a sale. All lines succeed together or nothing is written.
pub async fn submit_sale(
    State(state): State<AppState>,
    payload: Result<Json<SubmitSaleBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SaleCreated>)> {
    let Json(body) = payload?;

    let receipt = state.db.processor().submit_sale(&body.items).await?;

    Ok((
        StatusCode::CREATED,
        Json(SaleCreated {
            sale: SaleView::from(&receipt.sale),
            items_sold: receipt.items_sold,
        }),
    ))
}

pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SaleDetailResponse>> {
    let found = state.db.processor().get_sale_detail(&id).await?;

    Ok(Json(SaleDetailResponse {
        sale: SaleView::from(&found.sale),
        detail: found.details.iter().map(DetailLine::from).collect(),
    }))
}

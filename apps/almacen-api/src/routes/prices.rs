//! Supplier-wide repricing.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use almacen_core::{RepriceRequest, ValidationError};

use crate::error::ApiResult;
use crate::AppState;

/// `percentage_increase` accepts a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
pub struct RepriceBody {
    #[serde(default)]
    pub supplier_id: String,
    pub percentage_increase: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct RepriceResponse {
    pub message: String,
    pub updated_count: u64,
}

impl RepriceBody {
    fn into_request(self) -> Result<RepriceRequest, ValidationError> {
        let increase = self.percentage_increase.ok_or_else(|| ValidationError::Required {
            field: "percentage_increase".to_string(),
        })?;
        RepriceRequest::new(self.supplier_id, increase)
    }
}

pub async fn update_by_supplier(
    State(state): State<AppState>,
    payload: Result<Json<RepriceBody>, JsonRejection>,
) -> ApiResult<Json<RepriceResponse>> {
    let Json(body) = payload?;
    let request = body.into_request()?;

    let updated_count = state.db.prices().bulk_reprice(&request).await?;

    Ok(Json(RepriceResponse {
        message: format!(
            "Prices of supplier {} changed by {}%",
            request.supplier_id(),
            request.increase().normalize()
        ),
        updated_count,
    }))
}

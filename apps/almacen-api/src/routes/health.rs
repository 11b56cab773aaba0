//! Database health check.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DbHealth {
    pub message: String,
    pub backend: &'static str,
    pub server_time: DateTime<Utc>,
}

/// Round-trips to the database and reports its clock.
pub async fn db_health(State(state): State<AppState>) -> ApiResult<Json<DbHealth>> {
    let server_time = state.db.server_time().await?;

    Ok(Json(DbHealth {
        message: "Database connection OK".to_string(),
        backend: almacen_db::BACKEND_NAME,
        server_time,
    }))
}

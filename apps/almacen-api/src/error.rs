//! Error types for the HTTP API.
//!
//! ## Status Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StoreError / CoreError / DbError / extractor rejection                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError                                                               │
//! │   ├── BadRequest   400  { error, details? }  validation, stock,        │
//! │   │                                          duplicates, bad JSON      │
//! │   ├── NotFound     404  { error }                                       │
//! │   └── Internal     500  { error }            cause logged, not sent    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use almacen_core::{CoreError, ValidationError};
use almacen_db::{DbError, StoreError};

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest {
        message: String,
        details: Vec<String>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::BadRequest { message, details } => ErrorBody {
                error: message,
                details,
            },
            ApiError::NotFound(message) => ErrorBody {
                error: message,
                details: Vec::new(),
            },
            ApiError::Internal(cause) => {
                tracing::error!(error = %cause, "Request failed");
                ErrorBody {
                    error: "Internal server error".to_string(),
                    details: Vec::new(),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest {
            message: "Invalid request".to_string(),
            details: vec![err.to_string()],
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::Validation(v) => v.into(),
            CoreError::CheckoutRejected(problems) => ApiError::BadRequest {
                message,
                details: problems.iter().map(ToString::to_string).collect(),
            },
            CoreError::SaleNotFound(_) => ApiError::NotFound(message),
            CoreError::InvalidPrice { .. } | CoreError::AmountOverflow { .. } => {
                ApiError::bad_request(message)
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. }
            | DbError::ForeignKeyViolation { .. }
            | DbError::ConstraintViolation { .. } => ApiError::bad_request(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(e) => e.into(),
            StoreError::Db(e) => e.into(),
        }
    }
}

/// Malformed bodies keep the `{ error, details }` shape: a fixed message
/// and the extractor's explanation as the single detail.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            message: "Invalid request body".to_string(),
            details: vec![rejection.body_text()],
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest {
            message: "Invalid query string".to_string(),
            details: vec![rejection.body_text()],
        }
    }
}

//! API Error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use fee_ledger_core_rs::{RecorderError, RegistrarError};

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Registrar error: {0}")]
    Registrar(#[from] RegistrarError),

    #[error("Recorder error: {0}")]
    Recorder(#[from] RecorderError),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
            ApiError::Registrar(err) => {
                let code = match err {
                    RegistrarError::InvalidStudent { .. } => "INVALID_STUDENT",
                    RegistrarError::InvalidYear(_) => "INVALID_YEAR",
                    RegistrarError::InvalidAmount { .. } => "INVALID_AMOUNT",
                };
                (StatusCode::BAD_REQUEST, code, err.to_string())
            }
            ApiError::Recorder(err) => {
                let (status, code) = match err {
                    RecorderError::InvalidPaymentAmount { .. } => {
                        (StatusCode::BAD_REQUEST, "INVALID_PAYMENT_AMOUNT")
                    }
                    RecorderError::TransactionIdRequired { .. } => {
                        (StatusCode::BAD_REQUEST, "TRANSACTION_ID_REQUIRED")
                    }
                    RecorderError::InvalidAllocation { .. } => {
                        (StatusCode::BAD_REQUEST, "INVALID_ALLOCATION")
                    }
                    RecorderError::StaleAllocation => (StatusCode::CONFLICT, "STALE_ALLOCATION"),
                    RecorderError::NoOutstandingDues { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "NO_OUTSTANDING_DUES")
                    }
                    RecorderError::SurplusNotAccepted { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "SURPLUS_NOT_ACCEPTED")
                    }
                    RecorderError::InvariantViolation(_) => {
                        tracing::error!("ledger invariant violation: {}", err);
                        (StatusCode::INTERNAL_SERVER_ERROR, "LEDGER_INVARIANT_VIOLATION")
                    }
                };
                (status, code, err.to_string())
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

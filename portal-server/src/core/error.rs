use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::quotations::QuotationError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("resource not found")]
    NotFound,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("forbidden")]
    Forbidden,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ServerError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            ServerError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            ServerError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ServerError::Internal(err) => {
                // Log internal errors without leaking details to callers
                tracing::error!(error = ?err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ServerError::NotFound,
            StoreError::Duplicate(id) => ServerError::Conflict(format!("duplicate id: {id}")),
            StoreError::Conflict { .. } => ServerError::Conflict(err.to_string()),
        }
    }
}

impl From<QuotationError> for ServerError {
    fn from(err: QuotationError) -> Self {
        match err {
            QuotationError::PaymentNotFound(_)
            | QuotationError::ResubmissionNotFound(_) => ServerError::NotFound,
            QuotationError::Forbidden(_) => ServerError::Forbidden,
            QuotationError::Store(e) => e.into(),
            QuotationError::InvalidStatus { .. }
            | QuotationError::AdvanceAlreadyExists
            | QuotationError::AlreadyDecided
            | QuotationError::NotRejected => ServerError::Conflict(err.to_string()),
            QuotationError::MissingNotes
            | QuotationError::MissingReason
            | QuotationError::MissingAmount
            | QuotationError::MissingAdvancePercentage
            | QuotationError::ExceedsRemaining { .. }
            | QuotationError::NothingToPay
            | QuotationError::Amount(_) => ServerError::Validation(err.to_string()),
            QuotationError::Render(e) => ServerError::Internal(e.into()),
            QuotationError::File(e) => ServerError::Internal(e.into()),
        }
    }
}

/// Result alias for handlers
pub type Result<T> = std::result::Result<T, ServerError>;

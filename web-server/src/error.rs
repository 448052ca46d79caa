//! Error handling

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use cardio_core::{CardioError, HistoryError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Resource errors
    NotFound(String),

    // Validation errors
    ValidationError(String),

    // Model input disagrees with the loaded artifacts
    SchemaMismatch(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::SchemaMismatch(msg) => {
                tracing::error!("Schema mismatch: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Model input does not match the loaded artifacts")
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<CardioError> for AppError {
    fn from(err: CardioError) -> Self {
        match err {
            CardioError::Validation(msg) => AppError::ValidationError(msg),
            e @ CardioError::SchemaMismatch { .. } => AppError::SchemaMismatch(e.to_string()),
            CardioError::History(e @ HistoryError::OutOfRange { .. }) => AppError::NotFound(e.to_string()),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

/// A history index that is not a non-negative integer can never exist
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::NotFound(format!("invalid history index: {}", rejection.body_text()))
    }
}

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        CardioError::from(err).into()
    }
}

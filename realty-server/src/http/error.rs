//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes:
//! `{"error": "<kind>", "message": "<text>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Malformed path, body, or update (400)
    Validation(ValidationError),

    /// Required row missing (404)
    NotFound { message: String },

    /// Database or driver failure (500, logged).
    ///
    /// `message` is what the client sees; `source` only reaches the log.
    OperationFailed {
        message: &'static str,
        source: DbError,
    },
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Map a repository error for an operation.
    ///
    /// Repository NotFound becomes a 404 (`"<Resource> not found."`);
    /// anything else becomes a 500 carrying `message`.
    ///
    /// ```ignore
    /// HouseRepo::new(pool).get(id).await.map_err(ApiError::failed("Failed to fetch house."))?;
    /// ```
    pub fn failed(message: &'static str) -> impl FnOnce(DbError) -> Self {
        move |err| match err {
            DbError::NotFound { resource, .. } => Self::not_found(format!("{} not found.", resource)),
            source => Self::OperationFailed { message, source },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::NotFound { message } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": message
                }),
            ),
            Self::OperationFailed { message, source } => {
                // Log the driver error, return the operation message
                tracing::error!(error = %source, "{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": message
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

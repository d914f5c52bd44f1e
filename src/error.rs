// Centralized error type for the catalog and promotion endpoints.
// Domain modules (bookings, rewards, reviews, auth) carry their own error
// enums; everything shares the same JSON envelope shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Error type for handlers that work directly with reference data.
#[derive(Debug)]
pub enum ApiError {
    /// Request validation failures. Maps to HTTP 400.
    ValidationError(validator::ValidationErrors),

    /// Resource lookup by id came up empty. Maps to HTTP 404.
    NotFound { resource: String, id: String },

    /// Database failures. Maps to HTTP 500; detail is logged, not returned.
    DatabaseError(sqlx::Error),

    /// Anything else that should not leak detail. Maps to HTTP 500.
    InternalError(String),
}

/// JSON envelope shared by every error response in the service.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Machine-readable code (e.g. "VALIDATION_ERROR", "NOT_FOUND")
    pub error_code: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                let mut body = ErrorResponse::new("VALIDATION_ERROR", "Request validation failed");
                body.details =
                    Some(serde_json::to_value(&errors).unwrap_or(serde_json::json!({})));
                (StatusCode::BAD_REQUEST, body)
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("NOT_FOUND", format!("{} with id {} not found", resource, id)),
                )
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("DATABASE_ERROR", "A database error occurred"),
                )
            }
            ApiError::InternalError(internal_msg) => {
                warn!("Internal error: {}", internal_msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::DatabaseError(error)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::error::ErrorResponse;

/// Authentication and authorization error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// Caller's role does not permit the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// PIN verification rejected
    #[error("Invalid PIN")]
    InvalidPin,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Hashing error")]
    HashError,
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AuthError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("VALIDATION_ERROR", msg.clone()),
            ),
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHORIZED", "Missing authentication token"),
            ),
            AuthError::InvalidToken => {
                warn!("Invalid token attempt");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("UNAUTHORIZED", "Invalid token"),
                )
            }
            AuthError::ExpiredToken => {
                warn!("Expired token attempt");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("UNAUTHORIZED", "Token has expired"),
                )
            }
            AuthError::Forbidden(msg) => {
                warn!("Forbidden access attempt: {}", msg);
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse::new("FORBIDDEN", msg.clone()),
                )
            }
            AuthError::InvalidPin => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("INVALID_PIN", "Invalid PIN"),
            ),
            AuthError::DatabaseError(msg) => {
                error!("Database error in auth: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("DATABASE_ERROR", "A database error occurred"),
                )
            }
            AuthError::ConfigError(msg) => {
                error!("Auth configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred"),
                )
            }
            AuthError::HashError => {
                error!("PIN hashing failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

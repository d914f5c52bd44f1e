// Error types for review operations

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::error::ErrorResponse;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Review not found")]
    NotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("{0}")]
    Ownership(String),

    /// Only completed appointments may be reviewed, once each.
    #[error("{0}")]
    State(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for ReviewError {
    fn from(err: sqlx::Error) -> Self {
        ReviewError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ReviewError::Validation(msg) => {
                debug!("Review validation rejected: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("VALIDATION_ERROR", msg.clone()),
                )
            }
            ReviewError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", "Review not found"),
            ),
            ReviewError::AppointmentNotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", "Appointment not found"),
            ),
            ReviewError::Ownership(msg) => {
                warn!("Review ownership rejection: {}", msg);
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse::new("OWNERSHIP", msg.clone()),
                )
            }
            ReviewError::State(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("STATE_ERROR", msg.clone()),
            ),
            ReviewError::DatabaseError(msg) => {
                error!("Database error in reviews: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("DATABASE_ERROR", "Something went wrong, please try again"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

// Error types for rewards and loyalty operations

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use crate::error::ErrorResponse;

/// Error types for rewards operations
#[derive(Debug, Error)]
pub enum RewardsError {
    #[error("No customer profile")]
    ProfileNotFound,

    #[error("Unknown reward: {0}")]
    UnknownReward(String),

    /// Redemption rejected: the balance does not cover the cost.
    /// No points move and no voucher is created.
    #[error("Not enough points")]
    InsufficientPoints,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for RewardsError {
    fn from(err: sqlx::Error) -> Self {
        RewardsError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for RewardsError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            RewardsError::ProfileNotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", "No customer profile"),
            ),
            RewardsError::UnknownReward(id) => {
                debug!("Unknown reward requested: {}", id);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("NOT_FOUND", format!("Unknown reward: {}", id)),
                )
            }
            RewardsError::InsufficientPoints => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INSUFFICIENT_POINTS", "Not enough points"),
            ),
            RewardsError::DatabaseError(msg) => {
                error!("Database error in rewards: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("DATABASE_ERROR", "Something went wrong, please try again"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

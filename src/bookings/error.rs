// Error taxonomy for booking operations. Every lifecycle operation returns
// one of these; the variant picks both the HTTP status and a stable
// machine-readable code so clients can choose message and retry affordance.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::error::ErrorResponse;

/// Error types for booking operations
#[derive(Debug, Error)]
pub enum BookingError {
    /// The caller's input was malformed or violates a static rule
    /// (blackout date, bad slot, inapplicable voucher). Safe to correct
    /// and retry.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The input was valid but the slot was taken concurrently. The caller
    /// should re-fetch availability and pick again.
    #[error("The selected slot is no longer available")]
    SlotConflict,

    /// The appointment has exhausted its reschedule allowance.
    #[error("Reschedule limit reached")]
    RescheduleLimit,

    /// No appointment (or related row) matches the given id.
    #[error("Appointment not found")]
    NotFound,

    /// The appointment exists but belongs to someone else.
    #[error("{0}")]
    Ownership(String),

    /// The requested transition is not valid from the current status.
    #[error("{0}")]
    State(String),

    /// A collaborator call failed; the operation did not happen.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        // A unique violation on the slot index is a concurrent double-booking,
        // surfaced as a conflict rather than a server fault.
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.constraint() == Some("appointment_slot_unique") {
                return BookingError::SlotConflict;
            }
        }
        BookingError::Database(err.to_string())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            BookingError::Validation(msg) => {
                debug!("Booking validation rejected: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("VALIDATION_ERROR", msg.clone()),
                )
            }
            BookingError::SlotConflict => {
                warn!("Slot conflict on booking write");
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new(
                        "SLOT_CONFLICT",
                        "The selected slot is no longer available",
                    ),
                )
            }
            BookingError::RescheduleLimit => (
                StatusCode::CONFLICT,
                ErrorResponse::new("RESCHEDULE_LIMIT", "Reschedule limit reached"),
            ),
            BookingError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", "Appointment not found"),
            ),
            BookingError::Ownership(msg) => {
                warn!("Ownership rejection: {}", msg);
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse::new("OWNERSHIP", msg.clone()),
                )
            }
            BookingError::State(msg) => {
                debug!("State rejection: {}", msg);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse::new("STATE_ERROR", msg.clone()),
                )
            }
            BookingError::Database(msg) => {
                error!("Database error in bookings: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("DATABASE_ERROR", "Something went wrong, please try again"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

// HTTP handlers for booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::{SessionUser, StaffUser};
use crate::bookings::availability::SlotStatus;
use crate::bookings::error::BookingError;
use crate::bookings::models::{
    BookingResponse, BookingsOverview, CancelResponse, CheckInResponse, CreateBookingRequest,
    QuoteRequest, QuoteResponse, Receipt, RescheduleRequest,
};
use crate::bookings::models::AppointmentView;

/// Query parameters for the availability grid
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
}

/// Query parameters for selectable voucher options
#[derive(Debug, Deserialize)]
pub struct VoucherOptionsQuery {
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
}

/// Handler for POST /api/bookings/quote
/// Previews checkout pricing for a (service, stylist, discount) selection
pub async fn quote_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::Validation(e.to_string()))?;

    let quote = state.booking_service.quote(session.user_id, request).await?;
    Ok(Json(quote))
}

/// Handler for POST /api/bookings
/// Creates a conflict-checked, fully priced booking after payment capture
pub async fn create_booking_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::Validation(e.to_string()))?;

    let booking = state
        .booking_service
        .create(session.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler for GET /api/bookings
/// The caller's schedule, split into upcoming and history. Sweeps run first
/// so overdue rows surface with their final status.
pub async fn list_bookings_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
) -> Result<Json<BookingsOverview>, BookingError> {
    state.reconciler.run_sweeps().await;

    let overview = state
        .booking_service
        .list_for_customer(session.user_id)
        .await?;

    Ok(Json(overview))
}

/// Handler for GET /api/availability
pub async fn availability_handler(
    State(state): State<crate::AppState>,
    _session: SessionUser,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<SlotStatus>>, BookingError> {
    let grid = state
        .booking_service
        .availability(query.staff_id, query.date)
        .await?;

    Ok(Json(grid))
}

/// Handler for POST /api/bookings/:id/reschedule
pub async fn reschedule_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<RescheduleRequest>,
) -> Result<StatusCode, BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::Validation(e.to_string()))?;

    state
        .booking_service
        .reschedule(session.user_id, appointment_id, request)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /api/bookings/:id/cancel
pub async fn cancel_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<CancelResponse>, BookingError> {
    let outcome = state
        .booking_service
        .cancel(session.user_id, appointment_id)
        .await?;

    Ok(Json(outcome))
}

/// Handler for GET /api/bookings/voucher-options
/// Vouchers applicable to a selection; inapplicable fixed vouchers are
/// filtered out rather than offered
pub async fn voucher_options_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
    Query(query): Query<VoucherOptionsQuery>,
) -> Result<Json<Vec<crate::rewards::Voucher>>, BookingError> {
    let vouchers = state
        .booking_service
        .selectable_vouchers(session.user_id, query.service_id, query.staff_id)
        .await?;

    Ok(Json(vouchers))
}

/// Handler for GET /api/receipts
pub async fn receipts_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
) -> Result<Json<Vec<Receipt>>, BookingError> {
    let receipts = state.booking_service.receipts(session.user_id).await?;
    Ok(Json(receipts))
}

/// Handler for GET /api/staff/schedule (staff only)
pub async fn staff_schedule_handler(
    State(state): State<crate::AppState>,
    StaffUser(session): StaffUser,
) -> Result<Json<Vec<AppointmentView>>, BookingError> {
    state.reconciler.run_sweeps().await;

    let schedule = state
        .booking_service
        .staff_schedule(&session.email)
        .await?;

    Ok(Json(schedule))
}

/// Handler for POST /api/bookings/:ref_id/check-in (staff only)
/// Ref ids come from the customer's QR code at the counter
pub async fn check_in_handler(
    State(state): State<crate::AppState>,
    StaffUser(session): StaffUser,
    Path(ref_id): Path<String>,
) -> Result<Json<CheckInResponse>, BookingError> {
    let outcome = state
        .booking_service
        .check_in(&session.email, &ref_id)
        .await?;

    Ok(Json(outcome))
}

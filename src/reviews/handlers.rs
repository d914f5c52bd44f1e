// HTTP handlers for review endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::{SessionUser, StaffUser};
use crate::reviews::error::ReviewError;
use crate::reviews::models::{
    CompensationRequest, ReplyRequest, ReviewView, SubmitReviewRequest,
};

/// Handler for POST /api/bookings/:id/review
pub async fn submit_review_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<StatusCode, ReviewError> {
    request
        .validate()
        .map_err(|_| ReviewError::Validation("Rating must be between 1 and 5".to_string()))?;

    state
        .reviews_service
        .submit(session.user_id, appointment_id, request.rating, &request.comment)
        .await?;

    Ok(StatusCode::CREATED)
}

/// Handler for GET /api/reviews (staff only)
pub async fn list_reviews_handler(
    State(state): State<crate::AppState>,
    StaffUser(_session): StaffUser,
) -> Result<Json<Vec<ReviewView>>, ReviewError> {
    let reviews = state.reviews_service.list_all().await?;
    Ok(Json(reviews))
}

/// Handler for POST /api/reviews/:id/reply (staff only)
pub async fn reply_handler(
    State(state): State<crate::AppState>,
    StaffUser(_session): StaffUser,
    Path(review_id): Path<Uuid>,
    Json(request): Json<ReplyRequest>,
) -> Result<StatusCode, ReviewError> {
    request
        .validate()
        .map_err(|e| ReviewError::Validation(e.to_string()))?;

    state.reviews_service.reply(review_id, &request.reply).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /api/reviews/:id/compensation (staff only)
pub async fn compensation_handler(
    State(state): State<crate::AppState>,
    StaffUser(_session): StaffUser,
    Path(review_id): Path<Uuid>,
    Json(request): Json<CompensationRequest>,
) -> Result<StatusCode, ReviewError> {
    state
        .reviews_service
        .compensate(review_id, request.kind)
        .await?;

    Ok(StatusCode::CREATED)
}

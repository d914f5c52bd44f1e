// HTTP handlers for session and profile settings endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    middleware::SessionUser,
    models::{
        SessionResponse, UpdatePinRequest, UpdateThemeRequest, VerifyPinRequest, VerifyPinResponse,
    },
};

/// Handler for GET /api/session
/// Resolves the caller's profile, creating it on first login.
pub async fn session_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
) -> Result<Json<SessionResponse>, AuthError> {
    let profile = state.session_service.resolve_profile(&session).await?;
    Ok(Json(profile))
}

/// Handler for PUT /api/profile/theme
pub async fn update_theme_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
    Json(request): Json<UpdateThemeRequest>,
) -> Result<StatusCode, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    state
        .session_service
        .update_theme(&session, &request.theme)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PUT /api/profile/pin
pub async fn update_pin_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
    Json(request): Json<UpdatePinRequest>,
) -> Result<StatusCode, AuthError> {
    request
        .validate()
        .map_err(|_| AuthError::ValidationError("PIN must be exactly 6 digits".to_string()))?;

    state.session_service.set_pin(&session, &request.pin).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /api/profile/pin/verify
pub async fn verify_pin_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
    Json(request): Json<VerifyPinRequest>,
) -> Result<Json<VerifyPinResponse>, AuthError> {
    request
        .validate()
        .map_err(|_| AuthError::ValidationError("PIN must be exactly 6 digits".to_string()))?;

    let valid = state
        .session_service
        .verify_pin(&session, &request.pin)
        .await?;

    Ok(Json(VerifyPinResponse { valid }))
}

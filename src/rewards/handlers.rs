// HTTP handlers for rewards endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::middleware::SessionUser;
use crate::rewards::error::RewardsError;
use crate::rewards::models::{PointHistoryEntry, RedeemRequest, RewardsOverview, Voucher};

/// Handler for GET /api/rewards
/// Tier standing, balances, and the redemption catalog
pub async fn rewards_overview_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
) -> Result<Json<RewardsOverview>, RewardsError> {
    let overview = state.rewards_service.overview(session.user_id).await?;
    Ok(Json(overview))
}

/// Handler for GET /api/rewards/vouchers
pub async fn vouchers_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
) -> Result<Json<Vec<Voucher>>, RewardsError> {
    let vouchers = state
        .rewards_service
        .active_vouchers(session.user_id)
        .await?;

    Ok(Json(vouchers))
}

/// Handler for POST /api/rewards/redeem
pub async fn redeem_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
    Json(request): Json<RedeemRequest>,
) -> Result<(StatusCode, Json<Voucher>), RewardsError> {
    let voucher = state
        .rewards_service
        .redeem(session.user_id, &request.reward_id)
        .await?;

    Ok((StatusCode::CREATED, Json(voucher)))
}

/// Handler for GET /api/rewards/history
pub async fn point_history_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
) -> Result<Json<Vec<PointHistoryEntry>>, RewardsError> {
    let entries = state
        .rewards_service
        .point_history(session.user_id)
        .await?;

    Ok(Json(entries))
}

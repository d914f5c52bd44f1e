use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_rating;

/// A review row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub review_id: Uuid,
    pub appointment_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub reply: Option<String>,
    pub compensation: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Joined review projection for the staff review screen
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ReviewView {
    pub review_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub reply: Option<String>,
    pub compensation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    pub staff_name: String,
    pub service_name: Option<String>,
}

/// Request DTO for submitting a review
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitReviewRequest {
    #[validate(custom = "validate_rating")]
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// Request DTO for a staff reply
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplyRequest {
    #[validate(length(min = 1, message = "Reply text is required"))]
    pub reply: String,
}

/// Request DTO for granting a compensation voucher from a review
#[derive(Debug, Deserialize, ToSchema)]
pub struct CompensationRequest {
    pub kind: crate::rewards::CompensationKind,
}

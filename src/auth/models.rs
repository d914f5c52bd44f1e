// Session models and DTOs. Identity comes from the external auth provider's
// JWT; the role split is derived from the account email exactly once, here.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_pin, validate_theme};

/// Email suffix that routes an account to the staff role. This literal
/// string check is the single source of truth for role assignment.
pub const STAFF_EMAIL_SUFFIX: &str = "@lumina.com";

/// The two roles in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Staff,
}

impl Role {
    /// Resolve the role for an account email.
    pub fn from_email(email: &str) -> Role {
        if email.ends_with(STAFF_EMAIL_SUFFIX) {
            Role::Staff
        } else {
            Role::Customer
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Staff => "staff",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Session profile returned to the client on session resolution.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub points: i64,
    pub lifetime_points: i64,
    pub theme_preference: String,
    pub has_pin: bool,
}

/// Request DTO for updating the theme preference
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateThemeRequest {
    #[validate(custom = "validate_theme")]
    pub theme: String,
}

/// Request DTO for setting the transaction PIN
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePinRequest {
    #[validate(custom = "validate_pin")]
    pub pin: String,
}

/// Request DTO for verifying the transaction PIN before payment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyPinRequest {
    #[validate(custom = "validate_pin")]
    pub pin: String,
}

/// Response DTO for PIN verification
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyPinResponse {
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_suffix_routes_to_staff() {
        assert_eq!(Role::from_email("sarah@lumina.com"), Role::Staff);
        assert_eq!(Role::from_email("emily@example.com"), Role::Customer);
        // The check is a literal suffix match, nothing smarter
        assert_eq!(Role::from_email("someone@not-lumina.com"), Role::Customer);
        assert_eq!(Role::from_email("x@sub.lumina.com"), Role::Customer);
    }
}

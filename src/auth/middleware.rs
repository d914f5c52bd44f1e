// Session extractors for protected routes.
//
// `SessionUser` verifies the bearer token and resolves the role from the
// account email once; handlers carry the typed session object from there.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::auth::{error::AuthError, models::Role, token::TokenService};
use uuid::Uuid;

/// Authenticated session for protected routes.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AuthError::ConfigError("JWT_SECRET not configured".to_string()))?;

        let token_service = TokenService::new(jwt_secret);
        let claims = token_service.validate(token)?;

        let role = Role::from_email(&claims.email);

        Ok(SessionUser {
            user_id: claims.sub,
            email: claims.email,
            role,
        })
    }
}

/// Session extractor that additionally requires the staff role.
#[derive(Debug, Clone)]
pub struct StaffUser(pub SessionUser);

#[async_trait]
impl<S> FromRequestParts<S> for StaffUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionUser::from_request_parts(parts, state).await?;

        if session.role != Role::Staff {
            tracing::warn!(
                "Customer account {} attempted a staff-only operation",
                session.user_id
            );
            return Err(AuthError::Forbidden(
                "This operation requires a staff account".to_string(),
            ));
        }

        Ok(StaffUser(session))
    }
}

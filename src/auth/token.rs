// JWT validation for tokens issued by the auth collaborator.
// The provider signs HS256 tokens with a shared secret; this service only
// needs to verify them and read the identity claims.

use crate::auth::error::AuthError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by provider-issued session tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // provider user id
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token service for session token verification
pub struct TokenService {
    secret: String,
    session_duration: i64, // seconds
}

impl TokenService {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            session_duration: 3600,
        }
    }

    /// Validate a session token and return its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }

    /// Mint a session token. Production tokens come from the auth provider;
    /// this mirrors its contract for local tooling and tests.
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.session_duration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_validate_round_trip() {
        let service = TokenService::new("test-secret".to_string());
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id, "emily@example.com").unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "emily@example.com");
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let issuer = TokenService::new("secret-a".to_string());
        let verifier = TokenService::new("secret-b".to_string());

        let token = issuer.issue(Uuid::new_v4(), "emily@example.com").unwrap();
        assert!(matches!(
            verifier.validate(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let service = TokenService::new("test-secret".to_string());
        assert!(service.validate("not-a-token").is_err());
    }
}

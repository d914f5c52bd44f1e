// Session service - profile resolution and account settings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{info, warn};

use crate::auth::{
    error::AuthError,
    middleware::SessionUser,
    models::SessionResponse,
    repository::CustomersRepository,
};
use crate::rewards::RewardsService;

/// Coordinates profile lookup/creation and account settings.
#[derive(Clone)]
pub struct SessionService {
    customers: CustomersRepository,
    rewards: RewardsService,
}

impl SessionService {
    pub fn new(customers: CustomersRepository, rewards: RewardsService) -> Self {
        Self { customers, rewards }
    }

    /// Resolve the session's customer profile, creating it on first sight.
    ///
    /// First-time customers receive the welcome voucher and a greeting
    /// notification; failures there are logged and do not fail session
    /// resolution.
    pub async fn resolve_profile(&self, session: &SessionUser) -> Result<SessionResponse, AuthError> {
        let customer = match self.customers.find_by_user_id(session.user_id).await? {
            Some(existing) => existing,
            None => {
                let created = self
                    .customers
                    .create(session.user_id, "Valued Client", &session.email)
                    .await?;
                info!("Created customer profile for user {}", session.user_id);

                if let Err(e) = self.rewards.grant_welcome_gift(session.user_id).await {
                    warn!("Failed to grant welcome gift to {}: {}", session.user_id, e);
                }

                created
            }
        };

        Ok(SessionResponse {
            user_id: customer.user_id,
            name: customer.name,
            email: customer.email,
            role: session.role,
            points: customer.total_points,
            lifetime_points: customer.lifetime_points,
            theme_preference: customer.theme_preference,
            has_pin: customer.pin_hash.is_some(),
        })
    }

    pub async fn update_theme(&self, session: &SessionUser, theme: &str) -> Result<(), AuthError> {
        self.customers.update_theme(session.user_id, theme).await
    }

    /// Store the 6-digit transaction PIN, argon2-hashed.
    pub async fn set_pin(&self, session: &SessionUser, pin: &str) -> Result<(), AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(pin.as_bytes(), &salt)
            .map_err(|_| AuthError::HashError)?
            .to_string();

        self.customers.set_pin_hash(session.user_id, &hash).await
    }

    /// Verify the transaction PIN ahead of a payment confirmation.
    pub async fn verify_pin(&self, session: &SessionUser, pin: &str) -> Result<bool, AuthError> {
        let Some(stored) = self.customers.get_pin_hash(session.user_id).await? else {
            return Ok(false);
        };

        let parsed = PasswordHash::new(&stored).map_err(|_| AuthError::HashError)?;
        Ok(Argon2::default()
            .verify_password(pin.as_bytes(), &parsed)
            .is_ok())
    }
}

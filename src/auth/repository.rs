// Customer profile persistence.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::models::Customer;

const CUSTOMER_COLUMNS: &str = "customer_id, user_id, name, email, phone, total_points, \
                                lifetime_points, theme_preference, pin_hash, avatar_url";

/// Repository for customer profile rows
#[derive(Clone)]
pub struct CustomersRepository {
    pool: PgPool,
}

impl CustomersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Customer>, AuthError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Create a fresh profile with zeroed balances.
    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<Customer, AuthError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customer (user_id, name, email)
            VALUES ($1, $2, $3)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn update_theme(&self, user_id: Uuid, theme: &str) -> Result<(), AuthError> {
        sqlx::query("UPDATE customer SET theme_preference = $1 WHERE user_id = $2")
            .bind(theme)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_pin_hash(&self, user_id: Uuid, pin_hash: &str) -> Result<(), AuthError> {
        sqlx::query("UPDATE customer SET pin_hash = $1 WHERE user_id = $2")
            .bind(pin_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_pin_hash(&self, user_id: Uuid) -> Result<Option<String>, AuthError> {
        let hash: Option<Option<String>> =
            sqlx::query_scalar("SELECT pin_hash FROM customer WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(hash.flatten())
    }
}

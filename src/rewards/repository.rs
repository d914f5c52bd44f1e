// Persistence for vouchers, the point ledger, and the redemption
// transaction.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::rewards::error::RewardsError;
use crate::rewards::models::{NewVoucher, PointHistoryEntry, Voucher};

const VOUCHER_COLUMNS: &str = "id, user_id, title, description, discount_kind, discount_value, \
                               serial_number, expiry_date, used";

/// Repository for voucher rows
#[derive(Clone)]
pub struct VouchersRepository {
    pool: PgPool,
}

impl VouchersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Voucher>, RewardsError> {
        let voucher = sqlx::query_as::<_, Voucher>(&format!(
            "SELECT {VOUCHER_COLUMNS} FROM user_rewards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(voucher)
    }

    /// Unused, unexpired vouchers for a customer.
    pub async fn list_active(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Voucher>, RewardsError> {
        let vouchers = sqlx::query_as::<_, Voucher>(&format!(
            "SELECT {VOUCHER_COLUMNS} FROM user_rewards \
             WHERE user_id = $1 AND used = FALSE AND expiry_date >= $2 \
             ORDER BY expiry_date"
        ))
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(vouchers)
    }

    pub async fn insert(&self, new: NewVoucher) -> Result<Voucher, RewardsError> {
        let (kind, value) = new.spec.to_columns();

        let voucher = sqlx::query_as::<_, Voucher>(&format!(
            r#"
            INSERT INTO user_rewards (user_id, title, description, discount_kind,
                                      discount_value, serial_number, expiry_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {VOUCHER_COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(kind)
        .bind(value)
        .bind(&new.serial_number)
        .bind(new.expiry_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(voucher)
    }

    /// Whether a welcome gift was already issued to this account.
    pub async fn has_welcome_gift(&self, user_id: Uuid) -> Result<bool, RewardsError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_rewards \
             WHERE user_id = $1 AND serial_number LIKE 'WELCOME-%')",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }

    /// Redeem catalog points for a voucher as one atomic unit: the voucher
    /// insert, the balance decrement, and the spend ledger row commit or
    /// roll back together. Lifetime points are untouched.
    pub async fn redeem(
        &self,
        user_id: Uuid,
        cost: i64,
        new: NewVoucher,
    ) -> Result<Voucher, RewardsError> {
        let mut tx = self.pool.begin().await?;

        let balance: Option<i64> = sqlx::query_scalar(
            "SELECT total_points FROM customer WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let balance = balance.ok_or(RewardsError::ProfileNotFound)?;
        if balance < cost {
            return Err(RewardsError::InsufficientPoints);
        }

        let (kind, value) = new.spec.to_columns();
        let voucher = sqlx::query_as::<_, Voucher>(&format!(
            r#"
            INSERT INTO user_rewards (user_id, title, description, discount_kind,
                                      discount_value, serial_number, expiry_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {VOUCHER_COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(kind)
        .bind(value)
        .bind(&new.serial_number)
        .bind(new.expiry_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE customer SET total_points = total_points - $1 WHERE user_id = $2")
            .bind(cost)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO point_history (user_id, title, points, type) \
             VALUES ($1, $2, $3, 'spend')",
        )
        .bind(user_id)
        .bind(format!("Redeemed {}", new.title))
        .bind(cost)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(voucher)
    }
}

/// Repository for the append-only point ledger
#[derive(Clone)]
pub struct PointHistoryRepository {
    pool: PgPool,
}

impl PointHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PointHistoryEntry>, RewardsError> {
        let entries = sqlx::query_as::<_, PointHistoryEntry>(
            "SELECT id, user_id, title, points, type, created_at FROM point_history \
             WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

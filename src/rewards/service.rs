// Rewards service: tier standing, redemption, and voucher grants.

use chrono::{Duration, Months, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::auth::repository::CustomersRepository;
use crate::models::DiscountSpec;
use crate::notifications::{NewNotification, NotificationKind, NotificationsRepository};
use crate::rewards::error::RewardsError;
use crate::rewards::models::{
    catalog_item, NewVoucher, PointHistoryEntry, RewardsOverview, Voucher, REWARD_CATALOG,
};
use crate::rewards::repository::{PointHistoryRepository, VouchersRepository};
use crate::rewards::tier::tier_info;

/// Compensation voucher kinds staff may grant from a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CompensationKind {
    Rm100,
    Half,
    ThreeQuarters,
}

impl CompensationKind {
    fn voucher(&self) -> (&'static str, &'static str, DiscountSpec) {
        match self {
            CompensationKind::Rm100 => (
                "RM100 Voucher",
                "Customer Care Compensation",
                DiscountSpec::Fixed { cents: 10000 },
            ),
            CompensationKind::Half => (
                "50% OFF",
                "50% Off your next visit",
                DiscountSpec::Percentage { value: 50 },
            ),
            CompensationKind::ThreeQuarters => (
                "75% OFF",
                "75% Off your next visit",
                DiscountSpec::Percentage { value: 75 },
            ),
        }
    }

    pub fn title(&self) -> &'static str {
        self.voucher().0
    }
}

/// Service for loyalty and voucher business logic
#[derive(Clone)]
pub struct RewardsService {
    vouchers: VouchersRepository,
    history: PointHistoryRepository,
    customers: CustomersRepository,
    notifications: NotificationsRepository,
}

impl RewardsService {
    pub fn new(
        vouchers: VouchersRepository,
        history: PointHistoryRepository,
        customers: CustomersRepository,
        notifications: NotificationsRepository,
    ) -> Self {
        Self {
            vouchers,
            history,
            customers,
            notifications,
        }
    }

    /// Tier standing, balances, and the redemption catalog.
    pub async fn overview(&self, user_id: Uuid) -> Result<RewardsOverview, RewardsError> {
        let customer = self
            .customers
            .find_by_user_id(user_id)
            .await
            .map_err(|e| RewardsError::DatabaseError(e.to_string()))?
            .ok_or(RewardsError::ProfileNotFound)?;

        Ok(RewardsOverview {
            points: customer.total_points,
            lifetime_points: customer.lifetime_points,
            tier: tier_info(customer.lifetime_points),
            catalog: REWARD_CATALOG.to_vec(),
        })
    }

    pub async fn active_vouchers(&self, user_id: Uuid) -> Result<Vec<Voucher>, RewardsError> {
        self.vouchers.list_active(user_id, Utc::now()).await
    }

    pub async fn point_history(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PointHistoryEntry>, RewardsError> {
        self.history.list_for_user(user_id).await
    }

    /// Spend points on a catalog reward. Fails whole if the balance is
    /// short or the voucher insert fails; no partial deduction.
    pub async fn redeem(&self, user_id: Uuid, reward_id: &str) -> Result<Voucher, RewardsError> {
        let item = catalog_item(reward_id)
            .ok_or_else(|| RewardsError::UnknownReward(reward_id.to_string()))?;

        let voucher = self
            .vouchers
            .redeem(
                user_id,
                item.cost,
                NewVoucher {
                    user_id,
                    title: item.title.to_string(),
                    description: item.description.to_string(),
                    spec: item.spec,
                    serial_number: serial("RWD"),
                    expiry_date: Utc::now() + Duration::days(30),
                },
            )
            .await?;

        info!(
            "User {} redeemed {} for {} points",
            user_id, item.title, item.cost
        );

        Ok(voucher)
    }

    /// One-time 40% welcome voucher for a freshly created profile.
    pub async fn grant_welcome_gift(&self, user_id: Uuid) -> Result<(), RewardsError> {
        if self.vouchers.has_welcome_gift(user_id).await? {
            return Ok(());
        }

        self.vouchers
            .insert(NewVoucher {
                user_id,
                title: "40% OFF Welcome Gift".to_string(),
                description: "Enjoy 40% off your first service!".to_string(),
                spec: DiscountSpec::Percentage { value: 40 },
                serial_number: serial("WELCOME"),
                expiry_date: Utc::now() + Months::new(2),
            })
            .await?;

        self.notifications
            .insert(NewNotification::for_user(
                user_id,
                NotificationKind::Promo,
                "Welcome to Lumina!",
                "We are delighted to have you. Enjoy a 40% discount voucher on your first visit!"
                    .to_string(),
            ))
            .await
            .map_err(|e| RewardsError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// Fixed RM5 voucher for submitting a review. No points change hands.
    pub async fn grant_review_reward(&self, user_id: Uuid) -> Result<Voucher, RewardsError> {
        self.vouchers
            .insert(NewVoucher {
                user_id,
                title: "RM5 Voucher".to_string(),
                description: "Review Reward".to_string(),
                spec: DiscountSpec::Fixed { cents: 500 },
                serial_number: serial("REV"),
                expiry_date: Utc::now() + Duration::days(30),
            })
            .await
    }

    /// Staff-granted compensation voucher, 6-month expiry.
    pub async fn grant_compensation(
        &self,
        user_id: Uuid,
        kind: CompensationKind,
    ) -> Result<Voucher, RewardsError> {
        let (title, description, spec) = kind.voucher();

        let voucher = self
            .vouchers
            .insert(NewVoucher {
                user_id,
                title: title.to_string(),
                description: description.to_string(),
                spec,
                serial_number: serial("COMP"),
                expiry_date: Utc::now() + Months::new(6),
            })
            .await?;

        self.notifications
            .insert(NewNotification::for_user(
                user_id,
                NotificationKind::Promo,
                "Compensation Voucher Received",
                format!(
                    "We apologize for any inconvenience. A {} has been added to your account.",
                    title
                ),
            ))
            .await
            .map_err(|e| RewardsError::DatabaseError(e.to_string()))?;

        Ok(voucher)
    }
}

/// Voucher serial: prefix plus four random uppercase alphanumerics.
fn serial(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();
    format!("{}-{}", prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_shape() {
        let s = serial("RWD");
        assert!(s.starts_with("RWD-"));
        assert_eq!(s.len(), 8);
        assert!(s[4..].chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!s[4..].chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_compensation_kinds() {
        assert_eq!(CompensationKind::Rm100.title(), "RM100 Voucher");
        assert_eq!(
            CompensationKind::Half.voucher().2,
            DiscountSpec::Percentage { value: 50 }
        );
        assert_eq!(
            CompensationKind::ThreeQuarters.voucher().2,
            DiscountSpec::Percentage { value: 75 }
        );
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::DiscountSpec;
use crate::rewards::tier::TierInfo;

/// A voucher held by a customer. Created by redemption, review reward,
/// welcome gift, or staff compensation; consumed at most once at checkout.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Voucher {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub discount_kind: String,
    pub discount_value: i64,
    pub serial_number: String,
    pub expiry_date: DateTime<Utc>,
    pub used: bool,
}

impl Voucher {
    /// Structured discount for the pricing engine.
    pub fn discount_spec(&self) -> Option<DiscountSpec> {
        DiscountSpec::from_columns(&self.discount_kind, self.discount_value)
    }

    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date < now
    }
}

/// Parameters for inserting a voucher row
#[derive(Debug, Clone)]
pub struct NewVoucher {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub spec: DiscountSpec,
    pub serial_number: String,
    pub expiry_date: DateTime<Utc>,
}

/// An append-only point ledger row
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PointHistoryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub points: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub entry_type: String,
    pub created_at: DateTime<Utc>,
}

/// An item in the redemption catalog
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RewardCatalogItem {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub cost: i64,
    pub spec: DiscountSpec,
}

/// The points-to-voucher redemption catalog.
pub const REWARD_CATALOG: [RewardCatalogItem; 6] = [
    RewardCatalogItem {
        id: "r1",
        title: "RM10 Voucher",
        description: "RM10 off your next service.",
        cost: 500,
        spec: DiscountSpec::Fixed { cents: 1000 },
    },
    RewardCatalogItem {
        id: "r2",
        title: "RM20 Voucher",
        description: "RM20 off services over RM100.",
        cost: 1000,
        spec: DiscountSpec::Fixed { cents: 2000 },
    },
    RewardCatalogItem {
        id: "r3",
        title: "RM50 Voucher",
        description: "RM50 off any premium package.",
        cost: 2500,
        spec: DiscountSpec::Fixed { cents: 5000 },
    },
    RewardCatalogItem {
        id: "r4",
        title: "5% Off",
        description: "5% discount on total bill.",
        cost: 800,
        spec: DiscountSpec::Percentage { value: 5 },
    },
    RewardCatalogItem {
        id: "r5",
        title: "10% Off",
        description: "10% discount on total bill.",
        cost: 1500,
        spec: DiscountSpec::Percentage { value: 10 },
    },
    RewardCatalogItem {
        id: "r6",
        title: "20% Off",
        description: "20% off for VIP treatments.",
        cost: 3000,
        spec: DiscountSpec::Percentage { value: 20 },
    },
];

/// Look up a catalog item by its id.
pub fn catalog_item(id: &str) -> Option<&'static RewardCatalogItem> {
    REWARD_CATALOG.iter().find(|item| item.id == id)
}

/// Request DTO for redeeming points
#[derive(Debug, Deserialize, ToSchema)]
pub struct RedeemRequest {
    pub reward_id: String,
}

/// Response DTO for the rewards overview screen
#[derive(Debug, Serialize, ToSchema)]
pub struct RewardsOverview {
    pub points: i64,
    pub lifetime_points: i64,
    pub tier: TierInfo,
    pub catalog: Vec<RewardCatalogItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        let item = catalog_item("r1").unwrap();
        assert_eq!(item.cost, 500);
        assert_eq!(item.spec, DiscountSpec::Fixed { cents: 1000 });

        assert!(catalog_item("r99").is_none());
    }

    #[test]
    fn test_catalog_percentage_items_carry_values() {
        // Percentage rewards must be structured, not inferred from titles
        let item = catalog_item("r5").unwrap();
        assert_eq!(item.spec, DiscountSpec::Percentage { value: 10 });
    }

    #[test]
    fn test_voucher_expiry() {
        let now = Utc::now();
        let voucher = Voucher {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "RM10 Voucher".to_string(),
            description: String::new(),
            discount_kind: "fixed".to_string(),
            discount_value: 1000,
            serial_number: "RWD-TEST".to_string(),
            expiry_date: now - chrono::Duration::days(1),
            used: false,
        };

        assert!(voucher.expired(now));
        assert_eq!(
            voucher.discount_spec(),
            Some(DiscountSpec::Fixed { cents: 1000 })
        );
    }
}

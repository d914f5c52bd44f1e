// Reference data models: service catalog, stylists, promotions.
// Discount descriptors are parsed out of display text exactly once, here,
// into a tagged variant; the pricing engine never sees raw title strings.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::OnceLock;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A bookable salon service. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Service {
    #[sqlx(rename = "service_id")]
    pub id: Uuid,
    #[sqlx(rename = "service_name")]
    pub name: String,
    pub description: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
    pub category: String,
    pub image_url: Option<String>,
}

/// Stylist seniority rank. The rank fixes a per-booking surcharge which is
/// frozen into the receipt at booking time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
pub enum StylistRank {
    #[sqlx(rename = "Senior Director Stylist")]
    #[serde(rename = "Senior Director Stylist")]
    SeniorDirectorStylist,
    #[sqlx(rename = "Director Stylist")]
    #[serde(rename = "Director Stylist")]
    DirectorStylist,
    #[sqlx(rename = "Senior Stylist")]
    #[serde(rename = "Senior Stylist")]
    SeniorStylist,
}

impl StylistRank {
    /// Fixed surcharge in cents added to every booking with this rank.
    pub fn surcharge_cents(&self) -> i64 {
        match self {
            StylistRank::SeniorDirectorStylist => 5000,
            StylistRank::DirectorStylist => 3000,
            StylistRank::SeniorStylist => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StylistRank::SeniorDirectorStylist => "Senior Director Stylist",
            StylistRank::DirectorStylist => "Director Stylist",
            StylistRank::SeniorStylist => "Senior Stylist",
        }
    }
}

impl std::fmt::Display for StylistRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stylist on the roster.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Staff {
    #[sqlx(rename = "staff_id")]
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub rank: StylistRank,
    pub rating: f32,
    pub specialties: Vec<String>,
    pub avatar_url: Option<String>,
}

/// A customer profile. `total_points` is the spendable balance; the
/// lifetime counter only ever grows and drives the loyalty tier.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub customer_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub total_points: i64,
    pub lifetime_points: i64,
    pub theme_preference: String,
    #[serde(skip_serializing)]
    pub pin_hash: Option<String>,
    pub avatar_url: Option<String>,
}

/// A time-bounded promotion. `discount_display` is the marketing text
/// ("20% OFF", "RM50 OFF"); the structured form comes from `discount_spec`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Promotion {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub discount_display: String,
    pub image_url: Option<String>,
    pub active: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub applicable_services: Vec<Uuid>,
}

impl Promotion {
    /// Whether the promotion window covers the given date.
    pub fn in_window(&self, today: NaiveDate) -> bool {
        self.active && self.start_date <= today && today <= self.end_date
    }

    pub fn discount_spec(&self) -> Option<DiscountSpec> {
        DiscountSpec::parse_display(&self.discount_display)
    }
}

/// Request DTO for creating a promotion (staff tooling).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePromotionRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "Discount text is required"))]
    pub discount_display: String,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub applicable_services: Vec<Uuid>,
}

fn default_true() -> bool {
    true
}

/// Request DTO for updating a promotion. Omitted fields keep current values.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePromotionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub discount_display: Option<String>,
    pub image_url: Option<String>,
    pub active: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub applicable_services: Option<Vec<Uuid>>,
}

/// Structured discount descriptor.
///
/// Percentage vs fixed is decided at the data-mapping boundary (from the
/// promotion display text or the voucher's stored columns) and carried as a
/// tagged variant from there on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DiscountSpec {
    Percentage { value: u32 },
    Fixed { cents: i64 },
}

static DIGITS_RE: OnceLock<Regex> = OnceLock::new();

fn digits_re() -> &'static Regex {
    DIGITS_RE.get_or_init(|| Regex::new(r"(\d+)").expect("digit pattern is valid"))
}

impl DiscountSpec {
    /// Parse a display string such as "20% OFF" or "RM50 OFF".
    ///
    /// Percentage wins when a '%' is present; an "RM" amount is read as whole
    /// ringgit and converted to cents. Returns None when no amount is found.
    pub fn parse_display(text: &str) -> Option<DiscountSpec> {
        let amount: u32 = digits_re()
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())?;

        if text.contains('%') {
            Some(DiscountSpec::Percentage { value: amount })
        } else if text.to_lowercase().contains("rm") {
            Some(DiscountSpec::Fixed {
                cents: i64::from(amount) * 100,
            })
        } else {
            None
        }
    }

    /// Reassemble from the structured columns stored on voucher rows.
    pub fn from_columns(kind: &str, value: i64) -> Option<DiscountSpec> {
        match kind {
            "percentage" => u32::try_from(value)
                .ok()
                .map(|value| DiscountSpec::Percentage { value }),
            "fixed" => Some(DiscountSpec::Fixed { cents: value }),
            _ => None,
        }
    }

    /// Column values for persisting a discount row.
    pub fn to_columns(&self) -> (&'static str, i64) {
        match self {
            DiscountSpec::Percentage { value } => ("percentage", i64::from(*value)),
            DiscountSpec::Fixed { cents } => ("fixed", *cents),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_surcharges() {
        assert_eq!(StylistRank::SeniorDirectorStylist.surcharge_cents(), 5000);
        assert_eq!(StylistRank::DirectorStylist.surcharge_cents(), 3000);
        assert_eq!(StylistRank::SeniorStylist.surcharge_cents(), 0);
    }

    #[test]
    fn test_parse_percentage_display() {
        assert_eq!(
            DiscountSpec::parse_display("20% OFF"),
            Some(DiscountSpec::Percentage { value: 20 })
        );
        assert_eq!(
            DiscountSpec::parse_display("5% Off"),
            Some(DiscountSpec::Percentage { value: 5 })
        );
    }

    #[test]
    fn test_parse_fixed_display() {
        assert_eq!(
            DiscountSpec::parse_display("RM50 OFF"),
            Some(DiscountSpec::Fixed { cents: 5000 })
        );
        assert_eq!(
            DiscountSpec::parse_display("rm5 voucher"),
            Some(DiscountSpec::Fixed { cents: 500 })
        );
    }

    #[test]
    fn test_parse_display_rejects_unknown_text() {
        assert_eq!(DiscountSpec::parse_display("Free gift"), None);
        assert_eq!(DiscountSpec::parse_display("50 credits"), None);
    }

    #[test]
    fn test_percent_beats_rm_when_both_present() {
        // "RM" branding in the title must not demote an explicit percentage.
        assert_eq!(
            DiscountSpec::parse_display("RM Salon 10% OFF"),
            Some(DiscountSpec::Percentage { value: 10 })
        );
    }

    #[test]
    fn test_from_columns_round_trip() {
        let spec = DiscountSpec::Fixed { cents: 1000 };
        let (kind, value) = spec.to_columns();
        assert_eq!(DiscountSpec::from_columns(kind, value), Some(spec));

        let spec = DiscountSpec::Percentage { value: 40 };
        let (kind, value) = spec.to_columns();
        assert_eq!(DiscountSpec::from_columns(kind, value), Some(spec));
    }

    #[test]
    fn test_promotion_window() {
        let base = Promotion {
            id: Uuid::new_v4(),
            title: "Summer Glow Package".to_string(),
            description: String::new(),
            discount_display: "20% OFF".to_string(),
            image_url: None,
            active: true,
            start_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
            applicable_services: vec![],
        };

        assert!(base.in_window(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()));
        assert!(base.in_window(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()));
        assert!(!base.in_window(NaiveDate::from_ymd_opt(2026, 5, 31).unwrap()));
        assert!(!base.in_window(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()));

        let inactive = Promotion {
            active: false,
            ..base
        };
        assert!(!inactive.in_window(NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()));
    }
}

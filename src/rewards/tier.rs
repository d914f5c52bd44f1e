// Loyalty tiers, derived purely from lifetime points. Spending points never
// moves a member down a tier.

use serde::Serialize;
use utoipa::ToSchema;

/// Membership tiers in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum Tier {
    Silver,
    Gold,
    Platinum,
    Centurion,
}

impl Tier {
    /// Lifetime points required to enter this tier (inclusive).
    pub fn threshold(&self) -> i64 {
        match self {
            Tier::Silver => 0,
            Tier::Gold => 1000,
            Tier::Platinum => 5000,
            Tier::Centurion => 20000,
        }
    }

    pub fn next(&self) -> Option<Tier> {
        match self {
            Tier::Silver => Some(Tier::Gold),
            Tier::Gold => Some(Tier::Platinum),
            Tier::Platinum => Some(Tier::Centurion),
            Tier::Centurion => None,
        }
    }

    pub fn for_lifetime_points(points: i64) -> Tier {
        if points >= Tier::Centurion.threshold() {
            Tier::Centurion
        } else if points >= Tier::Platinum.threshold() {
            Tier::Platinum
        } else if points >= Tier::Gold.threshold() {
            Tier::Gold
        } else {
            Tier::Silver
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
            Tier::Centurion => "Centurion",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tier standing with linear progress toward the next tier.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TierInfo {
    pub current: Tier,
    pub next: Option<Tier>,
    pub tier_floor: i64,
    pub next_threshold: i64,
    pub progress_percent: f64,
}

/// Compute the tier standing for a lifetime point balance.
pub fn tier_info(lifetime_points: i64) -> TierInfo {
    let current = Tier::for_lifetime_points(lifetime_points);

    match current.next() {
        Some(next) => {
            let floor = current.threshold();
            let ceiling = next.threshold();
            let progress =
                (lifetime_points - floor) as f64 / (ceiling - floor) as f64 * 100.0;
            TierInfo {
                current,
                next: Some(next),
                tier_floor: floor,
                next_threshold: ceiling,
                progress_percent: progress,
            }
        }
        None => TierInfo {
            current,
            next: None,
            tier_floor: current.threshold(),
            next_threshold: current.threshold(),
            progress_percent: 100.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_lower_bounds_are_inclusive() {
        assert_eq!(Tier::for_lifetime_points(0), Tier::Silver);
        assert_eq!(Tier::for_lifetime_points(999), Tier::Silver);
        assert_eq!(Tier::for_lifetime_points(1000), Tier::Gold);
        assert_eq!(Tier::for_lifetime_points(4999), Tier::Gold);
        assert_eq!(Tier::for_lifetime_points(5000), Tier::Platinum);
        assert_eq!(Tier::for_lifetime_points(19999), Tier::Platinum);
        assert_eq!(Tier::for_lifetime_points(20000), Tier::Centurion);
        assert_eq!(Tier::for_lifetime_points(1_000_000), Tier::Centurion);
    }

    #[test]
    fn test_progress_is_linear_within_tier() {
        let info = tier_info(500);
        assert_eq!(info.current, Tier::Silver);
        assert_eq!(info.next, Some(Tier::Gold));
        assert!((info.progress_percent - 50.0).abs() < f64::EPSILON);

        let info = tier_info(3000);
        assert_eq!(info.current, Tier::Gold);
        assert!((info.progress_percent - 50.0).abs() < f64::EPSILON);

        let info = tier_info(12500);
        assert_eq!(info.current, Tier::Platinum);
        assert!((info.progress_percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_at_tier_entry_is_zero() {
        let info = tier_info(1000);
        assert_eq!(info.current, Tier::Gold);
        assert_eq!(info.progress_percent, 0.0);
    }

    #[test]
    fn test_centurion_pegged_at_hundred() {
        let info = tier_info(20000);
        assert_eq!(info.current, Tier::Centurion);
        assert!(info.next.is_none());
        assert_eq!(info.progress_percent, 100.0);

        let info = tier_info(90000);
        assert_eq!(info.progress_percent, 100.0);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Progress stays within [0, 100] and the tier is monotone in points.
    #[test]
    fn prop_progress_bounded_and_tier_monotone() {
        proptest!(|(points in 0i64..=1_000_000)| {
            let info = tier_info(points);
            prop_assert!(info.progress_percent >= 0.0);
            prop_assert!(info.progress_percent <= 100.0);

            let later = tier_info(points + 1);
            prop_assert!(later.current.threshold() >= info.current.threshold());
        });
    }

    /// Lifetime points always sit inside the reported tier's bounds.
    #[test]
    fn prop_points_within_tier_bounds() {
        proptest!(|(points in 0i64..=1_000_000)| {
            let info = tier_info(points);
            prop_assert!(points >= info.tier_floor);
            if let Some(next) = info.next {
                prop_assert!(points < next.threshold());
            }
        });
    }
}

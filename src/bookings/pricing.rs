// Checkout pricing engine.
//
// Pure integer-cent arithmetic; division by 100 happens only at display
// boundaries. Percentage discounts have an asymmetric base: promotions
// discount the service price alone, vouchers discount the gross including
// the stylist surcharge.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{DiscountSpec, StylistRank};

/// SST (sales and service tax) rate: 8%, applied to the discounted amount.
pub const SST_PERCENT: i64 = 8;

/// A discount as it reaches the engine, tagged with its origin.
///
/// Promotions and vouchers are mutually exclusive upstream; if a caller ever
/// passes a promotion it wins and any voucher is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedDiscount {
    Promotion(DiscountSpec),
    Voucher(DiscountSpec),
}

/// Fully itemized checkout quote. Every line is independently retrievable
/// and appears on the receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Quote {
    pub service_price_cents: i64,
    pub surcharge_cents: i64,
    pub discount_cents: i64,
    pub taxable_cents: i64,
    pub sst_cents: i64,
    pub rounding_cents: i64,
    pub total_payable_cents: i64,
}

/// Round `numerator / denominator` to the nearest integer, halves away from
/// zero. Inputs here are non-negative.
fn div_round(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator / 2) / denominator
}

/// Price a booking.
///
/// The computation clamps a negative post-discount amount to zero rather
/// than failing; discount applicability is the caller's concern
/// (`voucher_applicable`).
pub fn quote(
    base_price_cents: i64,
    rank: StylistRank,
    discount: Option<AppliedDiscount>,
) -> Quote {
    let surcharge_cents = rank.surcharge_cents();
    let gross = base_price_cents + surcharge_cents;

    let discount_cents = match discount {
        // Promotion percentages apply to the base service price only.
        Some(AppliedDiscount::Promotion(DiscountSpec::Percentage { value })) => {
            div_round(base_price_cents * i64::from(value), 100)
        }
        Some(AppliedDiscount::Promotion(DiscountSpec::Fixed { cents })) => cents,
        // Voucher percentages apply to the gross including surcharge.
        Some(AppliedDiscount::Voucher(DiscountSpec::Percentage { value })) => {
            div_round(gross * i64::from(value), 100)
        }
        Some(AppliedDiscount::Voucher(DiscountSpec::Fixed { cents })) => cents,
        None => 0,
    };

    let taxable_cents = (gross - discount_cents).max(0);
    let sst_cents = div_round(taxable_cents * SST_PERCENT, 100);
    let pre_round = taxable_cents + sst_cents;

    // Round the payable total to the nearest 5 cents.
    let total_payable_cents = div_round(pre_round, 5) * 5;
    let rounding_cents = total_payable_cents - pre_round;

    Quote {
        service_price_cents: base_price_cents,
        surcharge_cents,
        discount_cents,
        taxable_cents,
        sst_cents,
        rounding_cents,
        total_payable_cents,
    }
}

/// Whether a voucher may be offered against a given order value.
///
/// A fixed-value voucher must be strictly smaller than the gross
/// (base + surcharge); percentage vouchers always apply.
pub fn voucher_applicable(spec: &DiscountSpec, base_price_cents: i64, rank: StylistRank) -> bool {
    match spec {
        DiscountSpec::Percentage { .. } => true,
        DiscountSpec::Fixed { cents } => *cents < base_price_cents + rank.surcharge_cents(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_no_discount_director() {
        // Wash & Cut with a Director Stylist: 7500 + 3000 gross, 8% SST
        let q = quote(7500, StylistRank::DirectorStylist, None);

        assert_eq!(q.service_price_cents, 7500);
        assert_eq!(q.surcharge_cents, 3000);
        assert_eq!(q.discount_cents, 0);
        assert_eq!(q.taxable_cents, 10500);
        assert_eq!(q.sst_cents, 840);
        assert_eq!(q.total_payable_cents, 11340);
        assert_eq!(q.rounding_cents, 0);
    }

    #[test]
    fn test_quote_senior_stylist_has_no_surcharge() {
        let q = quote(4500, StylistRank::SeniorStylist, None);

        assert_eq!(q.surcharge_cents, 0);
        assert_eq!(q.taxable_cents, 4500);
        assert_eq!(q.sst_cents, 360);
        assert_eq!(q.total_payable_cents, 4860);
    }

    #[test]
    fn test_promotion_percentage_discounts_base_only() {
        let q = quote(
            7500,
            StylistRank::DirectorStylist,
            Some(AppliedDiscount::Promotion(DiscountSpec::Percentage {
                value: 10,
            })),
        );

        // 10% of 7500, not of 10500
        assert_eq!(q.discount_cents, 750);
        assert_eq!(q.taxable_cents, 9750);
    }

    #[test]
    fn test_voucher_percentage_discounts_gross() {
        let q = quote(
            7500,
            StylistRank::DirectorStylist,
            Some(AppliedDiscount::Voucher(DiscountSpec::Percentage {
                value: 10,
            })),
        );

        // 10% of 10500
        assert_eq!(q.discount_cents, 1050);
        assert_eq!(q.taxable_cents, 9450);
    }

    #[test]
    fn test_same_percentage_differs_between_promotion_and_voucher() {
        // The asymmetry is load-bearing: identical nominal percentages must
        // produce different discounts whenever the surcharge is non-zero.
        let promo = quote(
            7500,
            StylistRank::DirectorStylist,
            Some(AppliedDiscount::Promotion(DiscountSpec::Percentage {
                value: 10,
            })),
        );
        let voucher = quote(
            7500,
            StylistRank::DirectorStylist,
            Some(AppliedDiscount::Voucher(DiscountSpec::Percentage {
                value: 10,
            })),
        );

        assert_ne!(promo.discount_cents, voucher.discount_cents);
        assert_eq!(voucher.discount_cents - promo.discount_cents, 300);
    }

    #[test]
    fn test_fixed_promotion_rm_amount() {
        let q = quote(
            18000,
            StylistRank::SeniorStylist,
            Some(AppliedDiscount::Promotion(DiscountSpec::Fixed {
                cents: 5000,
            })),
        );

        assert_eq!(q.discount_cents, 5000);
        assert_eq!(q.taxable_cents, 13000);
        assert_eq!(q.sst_cents, 1040);
        assert_eq!(q.total_payable_cents, 14040);
    }

    #[test]
    fn test_oversized_discount_clamps_taxable_to_zero() {
        let q = quote(
            1000,
            StylistRank::SeniorStylist,
            Some(AppliedDiscount::Voucher(DiscountSpec::Fixed { cents: 5000 })),
        );

        assert_eq!(q.taxable_cents, 0);
        assert_eq!(q.sst_cents, 0);
        assert_eq!(q.total_payable_cents, 0);
        assert_eq!(q.rounding_cents, 0);
    }

    #[test]
    fn test_five_cent_rounding_up_and_down() {
        // taxable 1073 → sst 86 → pre-round 1159 → rounds up to 1160
        let q = quote(
            1073,
            StylistRank::SeniorStylist,
            None,
        );
        assert_eq!(q.sst_cents, 86);
        assert_eq!(q.total_payable_cents, 1160);
        assert_eq!(q.rounding_cents, 1);

        // taxable 1057 → sst 85 → pre-round 1142 → rounds down to 1140
        let q = quote(1057, StylistRank::SeniorStylist, None);
        assert_eq!(q.sst_cents, 85);
        assert_eq!(q.total_payable_cents, 1140);
        assert_eq!(q.rounding_cents, -2);
    }

    #[test]
    fn test_rounding_reported_never_absorbed() {
        let q = quote(1073, StylistRank::SeniorStylist, None);
        assert_eq!(
            q.total_payable_cents,
            q.taxable_cents + q.sst_cents + q.rounding_cents
        );
    }

    #[test]
    fn test_fixed_voucher_applicability_is_strict() {
        // Equal to the order value is NOT applicable; strictly less is.
        let spec = DiscountSpec::Fixed { cents: 10500 };
        assert!(!voucher_applicable(&spec, 7500, StylistRank::DirectorStylist));

        let spec = DiscountSpec::Fixed { cents: 10499 };
        assert!(voucher_applicable(&spec, 7500, StylistRank::DirectorStylist));

        let spec = DiscountSpec::Fixed { cents: 10501 };
        assert!(!voucher_applicable(&spec, 7500, StylistRank::DirectorStylist));
    }

    #[test]
    fn test_percentage_voucher_always_applicable() {
        let spec = DiscountSpec::Percentage { value: 100 };
        assert!(voucher_applicable(&spec, 100, StylistRank::SeniorStylist));
    }

    #[test]
    fn test_welcome_voucher_end_to_end() {
        // 40% welcome voucher on Wash & Blowdry with a Senior Director:
        // gross 9500, discount 3800, taxable 5700, sst 456, pre-round 6156
        let q = quote(
            4500,
            StylistRank::SeniorDirectorStylist,
            Some(AppliedDiscount::Voucher(DiscountSpec::Percentage {
                value: 40,
            })),
        );

        assert_eq!(q.discount_cents, 3800);
        assert_eq!(q.taxable_cents, 5700);
        assert_eq!(q.sst_cents, 456);
        assert_eq!(q.total_payable_cents, 6155);
        assert_eq!(q.rounding_cents, -1);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn rank_strategy() -> impl Strategy<Value = StylistRank> {
        prop_oneof![
            Just(StylistRank::SeniorDirectorStylist),
            Just(StylistRank::DirectorStylist),
            Just(StylistRank::SeniorStylist),
        ]
    }

    fn discount_strategy() -> impl Strategy<Value = Option<AppliedDiscount>> {
        prop_oneof![
            Just(None),
            (1u32..=90).prop_map(|value| Some(AppliedDiscount::Promotion(
                DiscountSpec::Percentage { value }
            ))),
            (1i64..=20_000).prop_map(|cents| Some(AppliedDiscount::Promotion(
                DiscountSpec::Fixed { cents }
            ))),
            (1u32..=90).prop_map(|value| Some(AppliedDiscount::Voucher(
                DiscountSpec::Percentage { value }
            ))),
            (1i64..=20_000).prop_map(|cents| Some(AppliedDiscount::Voucher(
                DiscountSpec::Fixed { cents }
            ))),
        ]
    }

    /// Surcharge is a pure function of rank with exactly three values.
    #[test]
    fn prop_surcharge_from_rank_alone() {
        proptest!(|(base in 0i64..=100_000, rank in rank_strategy())| {
            let q = quote(base, rank, None);
            prop_assert!(matches!(q.surcharge_cents, 0 | 3000 | 5000));
            prop_assert_eq!(q.surcharge_cents, rank.surcharge_cents());
        });
    }

    /// The total always reconciles from its line items and lands on a
    /// 5-cent boundary.
    #[test]
    fn prop_total_reconciles_and_is_multiple_of_five() {
        proptest!(|(
            base in 0i64..=100_000,
            rank in rank_strategy(),
            discount in discount_strategy()
        )| {
            let q = quote(base, rank, discount);
            prop_assert_eq!(
                q.total_payable_cents,
                q.taxable_cents + q.sst_cents + q.rounding_cents
            );
            prop_assert_eq!(q.total_payable_cents % 5, 0);
            prop_assert!(q.total_payable_cents >= 0);
        });
    }

    /// The taxable amount never goes negative no matter the discount.
    #[test]
    fn prop_taxable_clamped_at_zero() {
        proptest!(|(
            base in 0i64..=10_000,
            rank in rank_strategy(),
            cents in 0i64..=100_000
        )| {
            let q = quote(
                base,
                rank,
                Some(AppliedDiscount::Voucher(DiscountSpec::Fixed { cents })),
            );
            prop_assert!(q.taxable_cents >= 0);
        });
    }

    /// Rounding adjustment stays within half the rounding unit.
    #[test]
    fn prop_rounding_bounded() {
        proptest!(|(
            base in 0i64..=100_000,
            rank in rank_strategy(),
            discount in discount_strategy()
        )| {
            let q = quote(base, rank, discount);
            prop_assert!(q.rounding_cents >= -2 && q.rounding_cents <= 2);
        });
    }

    /// An applicable fixed voucher always leaves a positive taxable amount.
    #[test]
    fn prop_applicable_fixed_voucher_keeps_order_positive() {
        proptest!(|(
            base in 1i64..=100_000,
            rank in rank_strategy(),
            cents in 1i64..=100_000
        )| {
            let spec = DiscountSpec::Fixed { cents };
            prop_assume!(voucher_applicable(&spec, base, rank));

            let q = quote(base, rank, Some(AppliedDiscount::Voucher(spec)));
            prop_assert!(q.taxable_cents > 0);
        });
    }
}

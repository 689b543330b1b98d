use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::delivery::Charges;

use super::errors::OrderError;
use super::value_objects::DeliveryType;

// ============================================================================
// Order Pricing
// ============================================================================
//
// base      = distance_km * rate_per_km + weight_kg * rate_per_kg
// surcharge = 20% of base, urgent only
// discount  = 10% of (base + surcharge) when that exceeds 500
// extra fee = flat 15 when weight_kg exceeds 50, added after the discount
//
// Thresholds are strict. All arithmetic is exact decimal, never rounded.
//
// ============================================================================

pub const URGENT_SURCHARGE_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);
pub const DISCOUNT_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
pub const DISCOUNT_THRESHOLD: Decimal = Decimal::from_parts(500, 0, 0, false, 0);
pub const HEAVY_LOAD_THRESHOLD_KG: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
pub const HEAVY_LOAD_FEE: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// The four measurements and the delivery type that fully determine a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingInput {
    pub delivery_type: DeliveryType,
    pub distance_km: Decimal,
    pub weight_kg: Decimal,
    pub rate_per_km: Decimal,
    pub rate_per_kg: Decimal,
}

impl PricingInput {
    pub fn ensure_non_negative(&self) -> Result<(), OrderError> {
        let fields = [
            ("distance_km", self.distance_km),
            ("weight_kg", self.weight_kg),
            ("rate_per_km", self.rate_per_km),
            ("rate_per_kg", self.rate_per_kg),
        ];

        match fields.into_iter().find(|(_, value)| *value < Decimal::ZERO) {
            Some((field, value)) => Err(OrderError::NegativeValue { field, value }),
            None => Ok(()),
        }
    }
}

/// Priced result of an order request, as returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub delivery_type: DeliveryType,
    #[serde(flatten)]
    pub charges: Charges,
}

impl PriceBreakdown {
    pub fn base_charge(&self) -> Decimal {
        self.charges.distance_charge + self.charges.weight_charge
    }
}

fn mul(lhs: Decimal, rhs: Decimal) -> Result<Decimal, OrderError> {
    lhs.checked_mul(rhs).ok_or(OrderError::AmountOverflow)
}

fn add(lhs: Decimal, rhs: Decimal) -> Result<Decimal, OrderError> {
    lhs.checked_add(rhs).ok_or(OrderError::AmountOverflow)
}

/// Compute the breakdown for `input`. Fails only if an intermediate amount
/// does not fit in a `Decimal`.
pub fn price(input: &PricingInput) -> Result<PriceBreakdown, OrderError> {
    let distance_charge = mul(input.distance_km, input.rate_per_km)?;
    let weight_charge = mul(input.weight_kg, input.rate_per_kg)?;
    let base_charge = add(distance_charge, weight_charge)?;

    let surcharge = match input.delivery_type {
        DeliveryType::Urgent => mul(base_charge, URGENT_SURCHARGE_RATE)?,
        DeliveryType::Normal => Decimal::ZERO,
    };
    let mut subtotal = add(base_charge, surcharge)?;

    let discount = if subtotal > DISCOUNT_THRESHOLD {
        mul(subtotal, DISCOUNT_RATE)?
    } else {
        Decimal::ZERO
    };
    subtotal -= discount;

    let extra_fee = if input.weight_kg > HEAVY_LOAD_THRESHOLD_KG {
        HEAVY_LOAD_FEE
    } else {
        Decimal::ZERO
    };
    subtotal = add(subtotal, extra_fee)?;

    Ok(PriceBreakdown {
        delivery_type: input.delivery_type,
        charges: Charges {
            distance_charge,
            weight_charge,
            surcharge,
            discount,
            extra_fee,
            final_total: subtotal,
        },
    })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn input(
        delivery_type: DeliveryType,
        distance_km: Decimal,
        rate_per_km: Decimal,
        weight_kg: Decimal,
        rate_per_kg: Decimal,
    ) -> PricingInput {
        PricingInput {
            delivery_type,
            distance_km,
            weight_kg,
            rate_per_km,
            rate_per_kg,
        }
    }

    #[test]
    fn test_urgent_order_below_all_thresholds() {
        let breakdown = price(&input(
            DeliveryType::Urgent,
            dec!(30),
            dec!(2.5),
            dec!(12),
            dec!(4.0),
        ))
        .unwrap();

        assert_eq!(breakdown.charges.distance_charge, dec!(75));
        assert_eq!(breakdown.charges.weight_charge, dec!(48));
        assert_eq!(breakdown.base_charge(), dec!(123));
        assert_eq!(breakdown.charges.surcharge, dec!(24.6));
        assert_eq!(breakdown.charges.discount, Decimal::ZERO);
        assert_eq!(breakdown.charges.extra_fee, Decimal::ZERO);
        assert_eq!(breakdown.charges.final_total, dec!(147.6));
        assert_eq!(breakdown.delivery_type, DeliveryType::Urgent);
    }

    #[test]
    fn test_urgent_heavy_order_gets_discount_then_fee() {
        // base 500 + 20% = 600 > 500 -> discount 60 -> 540, 60kg -> +15
        let breakdown = price(&input(
            DeliveryType::Urgent,
            dec!(100),
            dec!(2),
            dec!(60),
            dec!(5),
        ))
        .unwrap();

        assert_eq!(breakdown.base_charge(), dec!(500));
        assert_eq!(breakdown.charges.surcharge, dec!(100));
        assert_eq!(breakdown.charges.discount, dec!(60));
        assert_eq!(breakdown.charges.extra_fee, dec!(15));
        assert_eq!(breakdown.charges.final_total, dec!(555));
    }

    #[test]
    fn test_normal_order_has_no_surcharge() {
        let breakdown = price(&input(
            DeliveryType::Normal,
            dec!(10),
            dec!(3),
            dec!(5),
            dec!(2),
        ))
        .unwrap();

        assert_eq!(breakdown.charges.surcharge, Decimal::ZERO);
        assert_eq!(breakdown.charges.final_total, dec!(40));
    }

    #[test]
    fn test_discount_threshold_is_strict() {
        let at_threshold = price(&input(
            DeliveryType::Normal,
            dec!(100),
            dec!(5),
            dec!(0),
            dec!(0),
        ))
        .unwrap();
        assert_eq!(at_threshold.charges.discount, Decimal::ZERO);
        assert_eq!(at_threshold.charges.final_total, dec!(500));

        let above_threshold = price(&input(
            DeliveryType::Normal,
            dec!(100),
            dec!(5.0001),
            dec!(0),
            dec!(0),
        ))
        .unwrap();
        assert_eq!(above_threshold.charges.discount, dec!(50.001));
        assert_eq!(above_threshold.charges.final_total, dec!(450.009));
    }

    #[test]
    fn test_discount_is_computed_after_surcharge() {
        // base 450 is under the threshold, but 450 * 1.2 = 540 is not
        let breakdown = price(&input(
            DeliveryType::Urgent,
            dec!(90),
            dec!(5),
            dec!(0),
            dec!(0),
        ))
        .unwrap();

        assert_eq!(breakdown.charges.surcharge, dec!(90));
        assert_eq!(breakdown.charges.discount, dec!(54));
        assert_eq!(breakdown.charges.final_total, dec!(486));
    }

    #[test]
    fn test_heavy_load_threshold_is_strict() {
        let at_threshold = price(&input(
            DeliveryType::Normal,
            dec!(0),
            dec!(0),
            dec!(50),
            dec!(1),
        ))
        .unwrap();
        assert_eq!(at_threshold.charges.extra_fee, Decimal::ZERO);
        assert_eq!(at_threshold.charges.final_total, dec!(50));

        let above_threshold = price(&input(
            DeliveryType::Normal,
            dec!(0),
            dec!(0),
            dec!(50.1),
            dec!(1),
        ))
        .unwrap();
        assert_eq!(above_threshold.charges.extra_fee, dec!(15));
        assert_eq!(above_threshold.charges.final_total, dec!(65.1));
    }

    #[test]
    fn test_extra_fee_is_never_discounted() {
        // base 1000, discount 100, fee 15 stays whole
        let breakdown = price(&input(
            DeliveryType::Normal,
            dec!(0),
            dec!(0),
            dec!(100),
            dec!(10),
        ))
        .unwrap();

        assert_eq!(breakdown.charges.discount, dec!(100));
        assert_eq!(breakdown.charges.extra_fee, dec!(15));
        assert_eq!(breakdown.charges.final_total, dec!(915));
    }

    #[test]
    fn test_negative_inputs_are_reported_by_field() {
        let request = input(DeliveryType::Normal, dec!(10), dec!(1), dec!(-2), dec!(1));
        assert!(matches!(
            request.ensure_non_negative(),
            Err(OrderError::NegativeValue { field: "weight_kg", .. })
        ));
        assert!(input(DeliveryType::Normal, dec!(0), dec!(0), dec!(0), dec!(0))
            .ensure_non_negative()
            .is_ok());
    }

    #[test]
    fn test_overflow_is_an_error_not_a_panic() {
        let request = input(DeliveryType::Urgent, Decimal::MAX, dec!(2), dec!(1), dec!(1));
        assert!(matches!(price(&request), Err(OrderError::AmountOverflow)));
    }

    #[test]
    fn test_breakdown_serializes_flat() {
        let breakdown = price(&input(
            DeliveryType::Urgent,
            dec!(30),
            dec!(2.5),
            dec!(12),
            dec!(4.0),
        ))
        .unwrap();

        let json = serde_json::to_value(breakdown).unwrap();
        assert_eq!(json["delivery_type"], "urgent");
        assert_eq!(json["surcharge"], serde_json::json!(24.6));
        assert_eq!(json["final_total"], serde_json::json!(147.6));
    }

    fn amount() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
    }

    fn delivery_type() -> impl Strategy<Value = DeliveryType> {
        prop_oneof![Just(DeliveryType::Normal), Just(DeliveryType::Urgent)]
    }

    proptest! {
        #[test]
        fn prop_breakdown_is_internally_consistent(
            delivery_type in delivery_type(),
            distance_km in amount(),
            weight_kg in amount(),
            rate_per_km in amount(),
            rate_per_kg in amount(),
        ) {
            let request = input(delivery_type, distance_km, rate_per_km, weight_kg, rate_per_kg);
            let breakdown = price(&request).unwrap();
            let charges = breakdown.charges;
            let base = breakdown.base_charge();

            prop_assert_eq!(charges.distance_charge, distance_km * rate_per_km);
            prop_assert_eq!(charges.weight_charge, weight_kg * rate_per_kg);
            prop_assert_eq!(
                charges.final_total,
                base + charges.surcharge - charges.discount + charges.extra_fee
            );
            prop_assert!(charges.ensure_non_negative().is_ok());

            match delivery_type {
                DeliveryType::Urgent => {
                    prop_assert_eq!(charges.surcharge, base * dec!(0.20));
                    prop_assert!(charges.final_total >= base);
                }
                DeliveryType::Normal => prop_assert_eq!(charges.surcharge, Decimal::ZERO),
            }

            let subtotal = base + charges.surcharge;
            if subtotal > dec!(500) {
                prop_assert_eq!(charges.discount, subtotal * dec!(0.10));
            } else {
                prop_assert_eq!(charges.discount, Decimal::ZERO);
                prop_assert!(charges.final_total >= base);
            }

            let expected_fee = if weight_kg > dec!(50) { dec!(15) } else { Decimal::ZERO };
            prop_assert_eq!(charges.extra_fee, expected_fee);
        }
    }
}

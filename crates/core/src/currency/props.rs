//! Property-based tests for currency normalization.
//!
//! - Results always carry two decimal places
//! - Rounding is half up, never truncation
//! - Identity conversion preserves the amount

use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use super::conversion::{MINOR_UNIT_PRECISION, convert_amount};

/// Strategy to generate positive decimal amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* amount and rate, the result has exactly two decimal places.
    #[test]
    fn prop_convert_has_minor_unit_scale(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let result = convert_amount(amount, rate, MINOR_UNIT_PRECISION);
        prop_assert!(result.is_some());
        prop_assert_eq!(result.unwrap_or_default().scale(), MINOR_UNIT_PRECISION);
    }

    /// *For any* amount and rate, the result is within half a cent of the
    /// exact product and never below it by half a cent or more.
    #[test]
    fn prop_convert_is_within_half_a_cent(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let exact = amount * rate;
        let result = convert_amount(amount, rate, MINOR_UNIT_PRECISION).unwrap();
        let half_cent = Decimal::new(5, 3);
        prop_assert!((result - exact).abs() <= half_cent);
        prop_assert!(exact - result < half_cent, "{} rounded down to {}", exact, result);
    }

    /// *For any* amount and rate, the result matches rust_decimal's
    /// midpoint-away-from-zero rounding.
    #[test]
    fn prop_convert_matches_half_up(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let expected = (amount * rate)
            .round_dp_with_strategy(MINOR_UNIT_PRECISION, RoundingStrategy::MidpointAwayFromZero);
        prop_assert_eq!(convert_amount(amount, rate, MINOR_UNIT_PRECISION), Some(expected));
    }

    /// *For any* amount already in cents, converting with rate 1 preserves it.
    #[test]
    fn prop_identity_preserves_amount(amount in positive_amount()) {
        prop_assert_eq!(convert_amount(amount, Decimal::ONE, MINOR_UNIT_PRECISION), Some(amount));
    }
}

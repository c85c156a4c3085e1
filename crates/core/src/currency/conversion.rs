//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for claim normalization:
//! - Always round to the base currency's minor unit
//! - Use round half up (midpoint away from zero), never truncate
//! - Store both original and converted amounts

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Minor-unit precision of every base currency in scope (cents).
pub const MINOR_UNIT_PRECISION: u32 = 2;

/// Converts an amount using the given exchange rate.
///
/// Rounds half up so that 0.125 becomes 0.13 at two places. The result always
/// carries exactly `decimal_places` digits of scale.
///
/// Returns `None` if the product does not fit in a `Decimal`.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Option<Decimal> {
    let mut converted = amount
        .checked_mul(rate)?
        .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    converted.rescale(decimal_places);
    Some(converted)
}

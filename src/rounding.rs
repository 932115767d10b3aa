//! Presentation rounding. Engines keep full precision; these are applied only
//! when a value leaves the crate for display, CSV or JSON.

use rust_decimal::prelude::*;

const CURRENCY_PLACES: u32 = 2;
const UNIT_RATE_PLACES: u32 = 4;

/// Rounds a monetary amount to sen (2 dp), half away from zero.
pub fn currency(value: f64) -> f64 {
    round_dp(value, CURRENCY_PLACES)
}

/// Rounds a per-kWh rate to 4 dp, half away from zero.
pub fn unit_rate(value: f64) -> f64 {
    round_dp(value, UNIT_RATE_PLACES)
}

/// Rounds through `Decimal` so shortest-form midpoints like 1.005 round up.
///
/// Values outside the `Decimal` range (or non-finite) are returned unchanged.
fn round_dp(value: f64, dp: u32) -> f64 {
    let Some(decimal) = Decimal::from_f64(value) else {
        return value;
    };
    let rounded = decimal
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(value);
    // normalise -0.0 so it never prints as "-0.00"
    if rounded == 0.0 { 0.0 } else { rounded }
}

//! Inverse tariff: recovers monthly usage from a bill amount.
//!
//! The forward bill is piecewise with upward jumps (retail charge and SST
//! start above 600 kWh, the high tier above 1500 kWh, EEI band edges) but it
//! never decreases as usage grows. That is the only property the search
//! relies on; no closed form or derivative is used.

use tracing::{debug, warn};

use super::calculator::TariffCalculator;

/// First upper bound tried when bracketing the target bill (kWh).
const SEED_UPPER_KWH: f64 = 100.0;
/// Bracket doublings before giving up on finding an upper bound.
const MAX_DOUBLINGS: u32 = 64;
/// Bisection stops once the bracket is narrower than this (kWh).
const USAGE_TOLERANCE_KWH: f64 = 1e-7;
/// Bisection stops once a midpoint reproduces the bill this closely.
const BILL_TOLERANCE: f64 = 1e-9;
/// Safety fuse; 1e7 kWh / 2^200 is far below the usage tolerance.
const MAX_ITERATIONS: u32 = 200;

/// Finds the usage whose forward bill matches a target amount.
#[derive(Debug, Clone, Copy)]
pub struct UsageEstimator<'a> {
    calculator: TariffCalculator<'a>,
}

impl<'a> UsageEstimator<'a> {
    pub fn new(calculator: TariffCalculator<'a>) -> Self {
        Self { calculator }
    }

    /// Estimates usage (kWh) for `target_bill` under `surcharge_rate`.
    ///
    /// Non-positive or non-finite targets return 0 without searching. When
    /// the target falls inside a jump of the bill curve there is no exact
    /// inverse; the result is the bracket end whose bill is closest to the
    /// target, with ties going to the smaller usage.
    pub fn estimate(&self, target_bill: f64, surcharge_rate: f64) -> f64 {
        if !(target_bill.is_finite() && target_bill > 0.0) {
            return 0.0;
        }

        let bill = |usage: f64| self.calculator.calculate(usage, surcharge_rate).total_bill;

        let mut lo = 0.0_f64;
        let mut hi = SEED_UPPER_KWH;
        let mut doublings = 0;
        while bill(hi) < target_bill {
            if doublings == MAX_DOUBLINGS {
                warn!(
                    target_bill,
                    surcharge_rate,
                    upper_kwh = hi,
                    "could not bracket target bill; tariff may not grow with usage"
                );
                return hi;
            }
            lo = hi;
            hi *= 2.0;
            doublings += 1;
        }

        // invariant: bill(lo) < target <= bill(hi)
        let mut iterations = 0;
        while hi - lo > USAGE_TOLERANCE_KWH {
            if iterations == MAX_ITERATIONS {
                warn!(
                    target_bill,
                    surcharge_rate,
                    lo,
                    hi,
                    "usage bisection hit iteration fuse; check tariff configuration"
                );
                break;
            }
            iterations += 1;

            let mid = lo + (hi - lo) / 2.0;
            if mid <= lo || mid >= hi {
                // bracket is down to adjacent floats
                break;
            }
            let mid_bill = bill(mid);
            if (mid_bill - target_bill).abs() < BILL_TOLERANCE {
                debug!(target_bill, usage_kwh = mid, iterations, "usage estimate converged on bill");
                return mid;
            }
            if mid_bill < target_bill {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let lo_residual = (target_bill - bill(lo)).abs();
        let hi_residual = (bill(hi) - target_bill).abs();
        let usage = if lo_residual <= hi_residual { lo } else { hi };
        debug!(target_bill, usage_kwh = usage, iterations, "usage estimate converged on bracket");
        usage
    }
}

//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use solar_quote::config::QuoteConfig;
use solar_quote::quote::QuoteInputs;

/// Default tables (`tnb_2025` preset).
pub fn default_config() -> QuoteConfig {
    QuoteConfig::tnb_2025()
}

/// Default inputs with the given bill amount.
pub fn inputs_for_bill(bill_amount: f64) -> QuoteInputs {
    QuoteInputs {
        bill_amount,
        ..QuoteInputs::default()
    }
}

/// Surcharge rates covering the rebate, neutral and surcharge brackets.
pub const SURCHARGE_RATES: [f64; 3] = [-0.02, 0.0, 0.10];

/// Absolute-difference comparison with a message on failure.
pub fn assert_close(actual: f64, expected: f64, tol: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= tol,
        "{what}: expected {expected}, got {actual} (tol {tol})"
    );
}

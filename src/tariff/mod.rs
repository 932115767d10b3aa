//! Domestic tariff: forward bill calculation and its inverse.

pub mod calculator;
pub mod estimator;
pub mod presets;

pub use calculator::{TariffBreakdown, TariffCalculator};
pub use estimator::UsageEstimator;
pub use presets::{SURCHARGE_PRESETS, SurchargePreset, surcharge_preset};

//! Common surcharge (AFA) rates by usage bracket.

use serde::Serialize;

/// A named surcharge rate a user can pick instead of typing one in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurchargePreset {
    /// Short key used on the command line and in the API.
    pub key: &'static str,
    pub label: &'static str,
    /// Rate in RM/kWh; negative is a rebate.
    pub rate: f64,
}

pub const SURCHARGE_PRESETS: &[SurchargePreset] = &[
    SurchargePreset {
        key: "rebate",
        label: "Rebate (<= 600 kWh)",
        rate: -0.02,
    },
    SurchargePreset {
        key: "neutral",
        label: "No Surcharge (601-1500 kWh)",
        rate: 0.0,
    },
    SurchargePreset {
        key: "surcharge",
        label: "Surcharge (> 1500 kWh)",
        rate: 0.10,
    },
];

/// Looks up a preset by key (case-insensitive).
pub fn surcharge_preset(key: &str) -> Option<&'static SurchargePreset> {
    SURCHARGE_PRESETS
        .iter()
        .find(|p| p.key.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(surcharge_preset("Rebate").map(|p| p.rate), Some(-0.02));
        assert_eq!(surcharge_preset("SURCHARGE").map(|p| p.rate), Some(0.10));
        assert!(surcharge_preset("bogus").is_none());
    }
}

//! TOML-based tariff, pricing and financing tables with preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level quote configuration parsed from TOML.
///
/// Every table the engines consume lives here: tariff rates and thresholds,
/// the EEI rebate bands, panel data and the system price table, discount
/// rules, and the bank installment rates. All sections have defaults matching
/// the `tnb_2025` preset, so a partial TOML file only overrides what it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteConfig {
    /// Tariff rates, thresholds and rebate bands.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Panel model and system price table.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Discount and rebate caps.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Bank installment plans.
    #[serde(default)]
    pub financing: FinancingConfig,
}

/// Domestic tariff rates and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Energy rate per kWh up to the high-usage threshold.
    pub base_energy_rate: f64,
    /// Added to the base rate for the whole usage once the threshold is crossed.
    pub high_usage_penalty: f64,
    /// Usage above which the high rate applies (kWh, exclusive).
    pub high_usage_threshold_kwh: f64,
    /// Capacity charge per kWh.
    pub capacity_rate: f64,
    /// Network charge per kWh.
    pub network_rate: f64,
    /// Flat retail charge.
    pub retail_charge: f64,
    /// Usage above which the retail charge applies (kWh, exclusive).
    pub retail_threshold_kwh: f64,
    /// KWTBB levy on energy + capacity + network (percent).
    pub kwtbb_percent: f64,
    /// SST on the taxable share of charges (percent).
    pub sst_percent: f64,
    /// Usage above which charges become taxable (kWh).
    pub sst_threshold_kwh: f64,
    /// EEI rebate bands, ascending by `up_to_kwh`.
    pub eei_bands: Vec<EeiBand>,
}

/// One EEI rebate band: usage up to `up_to_kwh` (inclusive) earns
/// `rate_per_kwh` off every kWh consumed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EeiBand {
    pub up_to_kwh: f64,
    pub rate_per_kwh: f64,
}

impl TariffConfig {
    /// Energy rate once usage exceeds the high-usage threshold.
    pub fn high_energy_rate(&self) -> f64 {
        self.base_energy_rate + self.high_usage_penalty
    }

    /// Smallest per-kWh charge an EEI rebate is netted against: base energy,
    /// capacity and network rates plus KWTBB, before any surcharge.
    pub fn min_charge_per_kwh(&self) -> f64 {
        (self.base_energy_rate + self.capacity_rate + self.network_rate)
            * (1.0 + self.kwtbb_percent / 100.0)
    }
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            base_energy_rate: 0.2703,
            high_usage_penalty: 0.1000,
            high_usage_threshold_kwh: 1500.0,
            capacity_rate: 0.0455,
            network_rate: 0.1285,
            retail_charge: 10.0,
            retail_threshold_kwh: 600.0,
            kwtbb_percent: 1.6,
            sst_percent: 8.0,
            sst_threshold_kwh: 600.0,
            eei_bands: default_eei_bands(),
        }
    }
}

/// EEI rates in RM/kWh by total monthly usage.
fn default_eei_bands() -> Vec<EeiBand> {
    [
        (200.0, 0.250),
        (250.0, 0.245),
        (300.0, 0.225),
        (350.0, 0.210),
        (400.0, 0.170),
        (450.0, 0.145),
        (500.0, 0.120),
        (550.0, 0.105),
        (600.0, 0.090),
        (650.0, 0.075),
        (700.0, 0.055),
        (750.0, 0.045),
        (800.0, 0.040),
        (850.0, 0.025),
        (900.0, 0.010),
        (1000.0, 0.005),
    ]
    .into_iter()
    .map(|(up_to_kwh, rate_per_kwh)| EeiBand {
        up_to_kwh,
        rate_per_kwh,
    })
    .collect()
}

/// Panel model and installed system prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Display name of the panel model.
    pub panel_model: String,
    /// Rated output of one panel (W).
    pub panel_wattage_w: f64,
    /// Smallest panel count with a quoted price.
    pub min_priced_panels: u32,
    /// Largest panel count with a quoted price.
    pub max_priced_panels: u32,
    /// Installed price by panel count.
    pub prices: Vec<PanelPrice>,
}

/// Installed system price for a given panel count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelPrice {
    pub panels: u32,
    pub price: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            panel_model: "JINKO SOLAR TIGER NEO N-TYPE".to_string(),
            panel_wattage_w: 620.0,
            min_priced_panels: 8,
            max_priced_panels: 48,
            prices: default_panel_prices(),
        }
    }
}

fn default_panel_prices() -> Vec<PanelPrice> {
    [
        (8, 19_888.0),
        (9, 21_288.0),
        (10, 22_688.0),
        (11, 24_088.0),
        (12, 25_488.0),
        (13, 26_888.0),
        (14, 28_288.0),
        (15, 29_688.0),
        (16, 30_888.0),
        (17, 32_088.0),
        (18, 33_288.0),
        (19, 34_488.0),
        (20, 35_688.0),
        (21, 36_888.0),
        (22, 38_088.0),
        (23, 39_288.0),
        (24, 40_488.0),
        (25, 41_588.0),
        (26, 42_688.0),
        (27, 43_788.0),
        (28, 44_888.0),
        (29, 45_988.0),
        (30, 47_088.0),
        (31, 48_188.0),
        (32, 49_288.0),
        (33, 50_388.0),
        (34, 51_488.0),
        (35, 52_588.0),
        (36, 53_688.0),
        (37, 54_788.0),
        (38, 55_888.0),
        (39, 56_988.0),
        (40, 58_088.0),
        (41, 59_188.0),
        (42, 60_288.0),
        (43, 61_388.0),
        (44, 62_488.0),
        (45, 63_588.0),
        (46, 64_688.0),
        (47, 65_788.0),
        (48, 66_888.0),
    ]
    .into_iter()
    .map(|(panels, price)| PanelPrice { panels, price })
    .collect()
}

/// Discount and rebate caps keyed on system price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    /// Base price above which the high discount cap applies (exclusive).
    pub high_price_threshold: f64,
    /// Base price from which the mid discount cap applies (inclusive).
    pub mid_price_threshold: f64,
    pub high_discount_cap_percent: f64,
    pub mid_discount_cap_percent: f64,
    pub base_discount_cap_percent: f64,
    /// Post-discount price below which the lower rebate cap applies.
    pub rebate_price_threshold: f64,
    pub rebate_cap_below_threshold: f64,
    pub rebate_cap_at_or_above_threshold: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            high_price_threshold: 50_000.0,
            mid_price_threshold: 30_000.0,
            high_discount_cap_percent: 7.0,
            mid_discount_cap_percent: 6.0,
            base_discount_cap_percent: 5.0,
            rebate_price_threshold: 30_000.0,
            rebate_cap_below_threshold: 600.0,
            rebate_cap_at_or_above_threshold: 1_000.0,
        }
    }
}

/// Installment plans offered per bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinancingConfig {
    pub banks: Vec<BankPlans>,
}

/// One bank and the installment durations it offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BankPlans {
    pub name: String,
    pub plans: Vec<InstallmentRate>,
}

/// Flat interest rate for one installment duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallmentRate {
    pub months: u32,
    pub rate_percent: f64,
}

impl Default for FinancingConfig {
    fn default() -> Self {
        let bank = |name: &str, plans: &[(u32, f64)]| BankPlans {
            name: name.to_string(),
            plans: plans
                .iter()
                .map(|&(months, rate_percent)| InstallmentRate {
                    months,
                    rate_percent,
                })
                .collect(),
        };
        Self {
            banks: vec![
                bank(
                    "MBB (Maybank)",
                    &[(6, 0.0), (12, 0.0), (24, 3.5), (36, 5.0), (48, 6.5), (60, 8.0)],
                ),
                bank(
                    "PBB (Public Bank)",
                    &[(6, 0.0), (12, 0.0), (24, 3.0), (36, 4.5), (48, 6.0), (60, 7.5)],
                ),
                bank("CIMB", &[(6, 0.0), (12, 1.5), (24, 3.5), (36, 5.5)]),
                bank("HLB (Hong Leong)", &[(6, 0.0), (12, 2.0), (24, 4.0), (36, 6.0)]),
                bank("AmBank", &[(12, 0.0), (24, 3.0), (36, 5.0)]),
            ],
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"tariff.eei_bands"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl QuoteConfig {
    /// Current domestic tariff with the default panel, pricing and bank tables.
    pub fn tnb_2025() -> Self {
        Self {
            tariff: TariffConfig::default(),
            solar: SolarConfig::default(),
            pricing: PricingConfig::default(),
            financing: FinancingConfig::default(),
        }
    }

    /// Same tables with the EEI rebate switched off.
    pub fn no_eei() -> Self {
        Self {
            tariff: TariffConfig {
                eei_bands: Vec::new(),
                ..TariffConfig::default()
            },
            ..Self::tnb_2025()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["tnb_2025", "no_eei"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "tnb_2025" => Ok(Self::tnb_2025()),
            "no_eei" => Ok(Self::no_eei()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all tables and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. The estimator relies
    /// on the bill growing with usage, so rates that could make it shrink are
    /// rejected here rather than discovered during a search: negative rates,
    /// EEI rates that increase with usage, and EEI rates at or above the
    /// per-kWh charge. Surcharge rates are per-request and not checked here.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let t = &self.tariff;
        for (field, value) in [
            ("tariff.base_energy_rate", t.base_energy_rate),
            ("tariff.high_usage_penalty", t.high_usage_penalty),
            ("tariff.capacity_rate", t.capacity_rate),
            ("tariff.network_rate", t.network_rate),
            ("tariff.retail_charge", t.retail_charge),
            ("tariff.kwtbb_percent", t.kwtbb_percent),
            ("tariff.sst_percent", t.sst_percent),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field, "must be finite and >= 0"));
            }
        }
        if t.high_usage_threshold_kwh <= 0.0 {
            errors.push(ConfigError::new("tariff.high_usage_threshold_kwh", "must be > 0"));
        }
        if t.retail_threshold_kwh < 0.0 {
            errors.push(ConfigError::new("tariff.retail_threshold_kwh", "must be >= 0"));
        }
        if t.sst_threshold_kwh < 0.0 {
            errors.push(ConfigError::new("tariff.sst_threshold_kwh", "must be >= 0"));
        }
        if t.eei_bands.windows(2).any(|w| w[0].up_to_kwh >= w[1].up_to_kwh) {
            errors.push(ConfigError::new(
                "tariff.eei_bands",
                "up_to_kwh must be strictly ascending",
            ));
        }
        if t.eei_bands.iter().any(|b| b.rate_per_kwh < 0.0) {
            errors.push(ConfigError::new("tariff.eei_bands", "rate_per_kwh must be >= 0"));
        }
        let min_charge = t.min_charge_per_kwh();
        if t.eei_bands.iter().any(|b| b.rate_per_kwh >= min_charge) {
            errors.push(ConfigError::new(
                "tariff.eei_bands",
                format!("rate_per_kwh must be below the per-kWh charge ({min_charge:.4})"),
            ));
        }
        if t.eei_bands.windows(2).any(|w| w[0].rate_per_kwh < w[1].rate_per_kwh) {
            errors.push(ConfigError::new(
                "tariff.eei_bands",
                "rate_per_kwh must not increase with usage",
            ));
        }

        let s = &self.solar;
        if !(s.panel_wattage_w.is_finite() && s.panel_wattage_w > 0.0) {
            errors.push(ConfigError::new("solar.panel_wattage_w", "must be > 0"));
        }
        if s.min_priced_panels > s.max_priced_panels {
            errors.push(ConfigError::new(
                "solar.min_priced_panels",
                "must be <= solar.max_priced_panels",
            ));
        }
        if s.prices.iter().any(|p| p.price < 0.0) {
            errors.push(ConfigError::new("solar.prices", "price must be >= 0"));
        }
        let mut panel_counts: Vec<u32> = s.prices.iter().map(|p| p.panels).collect();
        panel_counts.sort_unstable();
        if panel_counts.windows(2).any(|w| w[0] == w[1]) {
            errors.push(ConfigError::new("solar.prices", "duplicate panel count"));
        }

        let p = &self.pricing;
        if p.mid_price_threshold > p.high_price_threshold {
            errors.push(ConfigError::new(
                "pricing.mid_price_threshold",
                "must be <= pricing.high_price_threshold",
            ));
        }

        let f = &self.financing;
        if f.banks.is_empty() {
            errors.push(ConfigError::new("financing.banks", "at least one bank is required"));
        }
        for (i, bank) in f.banks.iter().enumerate() {
            if bank.plans.is_empty() {
                errors.push(ConfigError::new(
                    format!("financing.banks[{i}].plans"),
                    format!("bank \"{}\" offers no plans", bank.name),
                ));
            }
            if bank.plans.iter().any(|r| r.rate_percent < 0.0) {
                errors.push(ConfigError::new(
                    format!("financing.banks[{i}].plans"),
                    "rate_percent must be >= 0",
                ));
            }
        }
        let mut names: Vec<&str> = f.banks.iter().map(|b| b.name.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|w| w[0] == w[1]) {
            errors.push(ConfigError::new("financing.banks", "duplicate bank name"));
        }

        errors
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self::tnb_2025()
    }
}

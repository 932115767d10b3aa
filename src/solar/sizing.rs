use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::config::SolarConfig;
use crate::rounding::currency;

/// Days per billing month used when converting sun hours to monthly energy.
const DAYS_PER_MONTH: f64 = 30.0;

/// Recommended panel array for a monthly usage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarConfiguration {
    /// Number of panels; 0 when there is nothing to size for.
    pub panel_count: u32,
    /// Rated array capacity (kWp).
    pub system_size_kwp: f64,
    /// Expected monthly generation (kWh).
    pub monthly_generation_kwh: f64,
}

impl SolarConfiguration {
    /// Copy with capacity and generation rounded to 2 dp.
    pub fn rounded(&self) -> Self {
        Self {
            panel_count: self.panel_count,
            system_size_kwp: currency(self.system_size_kwp),
            monthly_generation_kwh: currency(self.monthly_generation_kwh),
        }
    }

    const EMPTY: Self = Self {
        panel_count: 0,
        system_size_kwp: 0.0,
        monthly_generation_kwh: 0.0,
    };
}

/// Maps required usage to a whole number of panels and looks up system prices.
///
/// The price table is a sparse map over a supported panel range; counts
/// outside the range or missing from the table have no price.
#[derive(Debug, Clone)]
pub struct SolarSizer {
    panel_wattage_w: f64,
    min_priced_panels: u32,
    max_priced_panels: u32,
    prices: BTreeMap<u32, f64>,
}

impl SolarSizer {
    pub fn new(config: &SolarConfig) -> Self {
        Self {
            panel_wattage_w: config.panel_wattage_w,
            min_priced_panels: config.min_priced_panels,
            max_priced_panels: config.max_priced_panels,
            prices: config.prices.iter().map(|p| (p.panels, p.price)).collect(),
        }
    }

    /// Monthly energy from one panel at the given peak sun hours (kWh).
    pub fn monthly_kwh_per_panel(&self, peak_sun_hours: f64) -> f64 {
        self.panel_wattage_w * peak_sun_hours * DAYS_PER_MONTH / 1000.0
    }

    /// Smallest array whose monthly generation covers `required_kwh`.
    ///
    /// Returns an empty configuration when `required_kwh <= 0`, the sun
    /// hours yield no energy per panel, or the count would overflow `u32`.
    pub fn size(&self, required_kwh: f64, peak_sun_hours: f64) -> SolarConfiguration {
        let per_panel = self.monthly_kwh_per_panel(peak_sun_hours);
        if !(required_kwh > 0.0 && per_panel > 0.0) {
            return SolarConfiguration::EMPTY;
        }

        let quotient = required_kwh / per_panel;
        if !(quotient < f64::from(u32::MAX - 1)) {
            warn!(required_kwh, peak_sun_hours, "required usage exceeds any sizable array");
            return SolarConfiguration::EMPTY;
        }

        // the float quotient can land just past an exact multiple, so settle
        // on the smallest count whose generation covers the requirement
        let mut panel_count = quotient.ceil() as u32;
        while panel_count > 0 && f64::from(panel_count - 1) * per_panel >= required_kwh {
            panel_count -= 1;
        }
        while f64::from(panel_count) * per_panel < required_kwh {
            panel_count += 1;
        }
        SolarConfiguration {
            panel_count,
            system_size_kwp: f64::from(panel_count) * self.panel_wattage_w / 1000.0,
            monthly_generation_kwh: f64::from(panel_count) * per_panel,
        }
    }

    /// Installed price for `panel_count`, or `None` when it is not quoted.
    pub fn system_price(&self, panel_count: u32) -> Option<f64> {
        if !(self.min_priced_panels..=self.max_priced_panels).contains(&panel_count) {
            return None;
        }
        self.prices.get(&panel_count).copied()
    }
}

/// Peak sun hour choices offered to the user (3.0 to 4.0 in 0.1 steps).
pub fn peak_sun_hour_options() -> Vec<f64> {
    (30..=40).map(|tenths| f64::from(tenths) / 10.0).collect()
}

/// Daytime self-consumption percentages offered to the user.
pub fn self_consumption_options() -> Vec<u32> {
    (10..=100).step_by(10).collect()
}

//! Forward tariff: itemised monthly bill for a given usage.

use serde::Serialize;

use crate::config::TariffConfig;
use crate::rounding;

/// Itemised monthly bill.
///
/// All amounts are kept at full precision; use [`TariffBreakdown::rounded`]
/// for a presentation copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TariffBreakdown {
    /// Energy charge at the tier rate applied to the whole usage.
    pub usage_cost: f64,
    pub capacity_cost: f64,
    pub network_cost: f64,
    /// Surcharge (AFA) cost; negative when the rate is a rebate.
    pub afa_cost: f64,
    /// Flat retail charge, zero at or below the retail threshold.
    pub retail_charge: f64,
    pub kwtbb_cost: f64,
    pub sst_cost: f64,
    /// EEI rebate, always <= 0.
    pub eei_cost: f64,
    pub total_bill: f64,
    /// Energy rate applied to this usage (base or high tier).
    pub effective_unit_rate: f64,
}

impl TariffBreakdown {
    /// Copy rounded to 2 dp for charges and 4 dp for the unit rate.
    pub fn rounded(&self) -> Self {
        Self {
            usage_cost: rounding::currency(self.usage_cost),
            capacity_cost: rounding::currency(self.capacity_cost),
            network_cost: rounding::currency(self.network_cost),
            afa_cost: rounding::currency(self.afa_cost),
            retail_charge: rounding::currency(self.retail_charge),
            kwtbb_cost: rounding::currency(self.kwtbb_cost),
            sst_cost: rounding::currency(self.sst_cost),
            eei_cost: rounding::currency(self.eei_cost),
            total_bill: rounding::currency(self.total_bill),
            effective_unit_rate: rounding::unit_rate(self.effective_unit_rate),
        }
    }

    /// Total bill divided by usage, or 0 when there is no usage.
    pub fn average_cost_per_kwh(&self, usage_kwh: f64) -> f64 {
        if usage_kwh > 0.0 {
            self.total_bill / usage_kwh
        } else {
            0.0
        }
    }
}

/// Pure tariff evaluator over an injected rate table.
#[derive(Debug, Clone, Copy)]
pub struct TariffCalculator<'a> {
    rates: &'a TariffConfig,
}

impl<'a> TariffCalculator<'a> {
    pub fn new(rates: &'a TariffConfig) -> Self {
        Self { rates }
    }

    /// Rate table this calculator evaluates.
    pub fn rates(&self) -> &'a TariffConfig {
        self.rates
    }

    /// Energy rate for a usage: the high rate replaces the base rate for the
    /// entire usage once it exceeds the threshold.
    pub fn unit_rate(&self, usage_kwh: f64) -> f64 {
        if usage_kwh > self.rates.high_usage_threshold_kwh {
            self.rates.high_energy_rate()
        } else {
            self.rates.base_energy_rate
        }
    }

    /// EEI rate for the band containing `usage_kwh`; 0 beyond the last band.
    pub fn eei_rate(&self, usage_kwh: f64) -> f64 {
        self.rates
            .eei_bands
            .iter()
            .find(|band| usage_kwh <= band.up_to_kwh)
            .map_or(0.0, |band| band.rate_per_kwh)
    }

    /// Computes the itemised bill.
    ///
    /// Negative or NaN usage is treated as zero. The SST base is the pre-tax
    /// subtotal scaled by the share of usage above the SST threshold, so a
    /// bill just over the threshold carries a proportionally tiny tax.
    pub fn calculate(&self, usage_kwh: f64, surcharge_rate: f64) -> TariffBreakdown {
        let r = self.rates;
        let usage = if usage_kwh > 0.0 { usage_kwh } else { 0.0 };

        let unit_rate = self.unit_rate(usage);
        let usage_cost = unit_rate * usage;
        let capacity_cost = r.capacity_rate * usage;
        let network_cost = r.network_rate * usage;
        let afa_cost = surcharge_rate * usage;

        let retail_charge = if usage > r.retail_threshold_kwh {
            r.retail_charge
        } else {
            0.0
        };

        let kwtbb_cost = (usage_cost + capacity_cost + network_cost) * r.kwtbb_percent / 100.0;

        let pre_tax = usage_cost + capacity_cost + network_cost + afa_cost + retail_charge + kwtbb_cost;
        let taxable_fraction = if usage > 0.0 {
            (usage - r.sst_threshold_kwh).max(0.0) / usage
        } else {
            0.0
        };
        let sst_cost = pre_tax * taxable_fraction * r.sst_percent / 100.0;

        let eei_cost = -(self.eei_rate(usage) * usage);

        TariffBreakdown {
            usage_cost,
            capacity_cost,
            network_cost,
            afa_cost,
            retail_charge,
            kwtbb_cost,
            sst_cost,
            eei_cost,
            total_bill: pre_tax + sst_cost + eei_cost,
            effective_unit_rate: unit_rate,
        }
    }
}

use serde::Serialize;

use crate::rounding::{currency, unit_rate};
use crate::tariff::TariffCalculator;

/// Day/night split of a month under net billing.
///
/// Exported energy only offsets night import; generation beyond that is
/// forfeited as `unused_surplus_kwh`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetBillingResult {
    /// Usage met directly by daytime generation.
    pub self_consumed_kwh: f64,
    /// Surplus generation credited against night import.
    pub exportable_kwh: f64,
    /// Surplus generation beyond night import, not credited.
    pub unused_surplus_kwh: f64,
    pub export_value: f64,
    /// Usage imported from the grid outside solar hours.
    pub night_usage_kwh: f64,
    /// Full tariff bill for the night usage alone.
    pub night_bill: f64,
    /// Night bill less export credit; negative means a net credit.
    pub net_bill: f64,
    pub export_unit_rate: f64,
}

impl NetBillingResult {
    const EMPTY: Self = Self {
        self_consumed_kwh: 0.0,
        exportable_kwh: 0.0,
        unused_surplus_kwh: 0.0,
        export_value: 0.0,
        night_usage_kwh: 0.0,
        night_bill: 0.0,
        net_bill: 0.0,
        export_unit_rate: 0.0,
    };

    /// Copy with energy and money at 2 dp and the export rate at 4 dp.
    pub fn rounded(&self) -> Self {
        Self {
            self_consumed_kwh: currency(self.self_consumed_kwh),
            exportable_kwh: currency(self.exportable_kwh),
            unused_surplus_kwh: currency(self.unused_surplus_kwh),
            export_value: currency(self.export_value),
            night_usage_kwh: currency(self.night_usage_kwh),
            night_bill: currency(self.night_bill),
            net_bill: currency(self.net_bill),
            export_unit_rate: unit_rate(self.export_unit_rate),
        }
    }

    /// Surplus generation before the export cap is applied.
    pub fn raw_exportable_kwh(&self) -> f64 {
        self.exportable_kwh + self.unused_surplus_kwh
    }
}

/// Projects a month under self-consumption-first net billing.
#[derive(Debug, Clone, Copy)]
pub struct NetBillingProjector<'a> {
    calculator: TariffCalculator<'a>,
}

impl<'a> NetBillingProjector<'a> {
    pub fn new(calculator: TariffCalculator<'a>) -> Self {
        Self { calculator }
    }

    /// Export credit rate for a night usage.
    ///
    /// Uses the tier rate of the night usage alone, switching to the high
    /// rate from the threshold upwards (inclusive), not the blended average.
    pub fn export_unit_rate(&self, night_usage_kwh: f64) -> f64 {
        let rates = self.calculator.rates();
        if night_usage_kwh >= rates.high_usage_threshold_kwh {
            rates.high_energy_rate()
        } else {
            rates.base_energy_rate
        }
    }

    /// Splits `required_kwh` into self-consumed and night usage and credits
    /// surplus generation against the night bill.
    ///
    /// `self_consumption_fraction` is clamped to `[0, 1]`. Returns an all-zero
    /// result when there is no required usage.
    pub fn project(
        &self,
        required_kwh: f64,
        generation_kwh: f64,
        self_consumption_fraction: f64,
        surcharge_rate: f64,
    ) -> NetBillingResult {
        if !(required_kwh > 0.0) {
            return NetBillingResult::EMPTY;
        }
        let fraction = if self_consumption_fraction.is_nan() {
            0.0
        } else {
            self_consumption_fraction.clamp(0.0, 1.0)
        };

        let self_consumed = required_kwh * fraction;
        let night_usage = (required_kwh - self_consumed).max(0.0);
        let raw_exportable = (generation_kwh - self_consumed).max(0.0);

        let exportable = raw_exportable.min(night_usage);
        let unused_surplus = (raw_exportable - night_usage).max(0.0);

        let export_unit_rate = self.export_unit_rate(night_usage);
        let export_value = exportable * export_unit_rate;
        let night_bill = self
            .calculator
            .calculate(night_usage, surcharge_rate)
            .total_bill;

        NetBillingResult {
            self_consumed_kwh: self_consumed,
            exportable_kwh: exportable,
            unused_surplus_kwh: unused_surplus,
            export_value,
            night_usage_kwh: night_usage,
            night_bill,
            net_bill: night_bill - export_value,
            export_unit_rate,
        }
    }
}

//! End-to-end quote: bill amount in, usage, solar sizing, net billing,
//! pricing and financing out.
//!
//! Every figure is a pure function of [`QuoteConfig`] and [`QuoteInputs`];
//! callers recompute the whole quote whenever any input changes.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::config::QuoteConfig;
use crate::error::FinanceError;
use crate::finance::{FinancingEngine, LoanPlan, PricingBreakdown, PricingEngine, PricingRequest};
use crate::rounding::{currency, unit_rate};
use crate::solar::{NetBillingProjector, NetBillingResult, SolarConfiguration, SolarSizer};
use crate::tariff::{TariffBreakdown, TariffCalculator, UsageEstimator};

/// User-adjustable inputs for one quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteInputs {
    /// Monthly bill amount (RM).
    pub bill_amount: f64,
    /// Surcharge (AFA) rate in RM/kWh; negative is a rebate.
    pub surcharge_rate: f64,
    pub peak_sun_hours: f64,
    /// Share of usage consumed during solar hours, in percent.
    pub self_consumption_percent: f64,
    pub discount_percent: f64,
    pub fixed_rebate: f64,
    pub campaign_deduction: f64,
    pub bank: String,
    pub duration_months: u32,
}

impl Default for QuoteInputs {
    fn default() -> Self {
        Self {
            bill_amount: 0.0,
            surcharge_rate: 0.0,
            peak_sun_hours: 3.4,
            self_consumption_percent: 30.0,
            discount_percent: 0.0,
            fixed_rebate: 0.0,
            campaign_deduction: 0.0,
            bank: "MBB (Maybank)".to_string(),
            duration_months: 60,
        }
    }
}

impl QuoteInputs {
    fn pricing_request(&self) -> PricingRequest {
        PricingRequest {
            discount_percent: self.discount_percent,
            fixed_rebate: self.fixed_rebate,
            campaign_deduction: self.campaign_deduction,
        }
    }
}

/// Complete quote derived from a bill amount.
///
/// `system_price`, `pricing` and `loan` are `None` when the recommended
/// panel count has no quoted price; a quoted price of zero is `Some(0.0)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub estimated_usage_kwh: f64,
    /// Bill recomputed at the estimated usage.
    pub bill: TariffBreakdown,
    pub average_cost_per_kwh: f64,
    pub panel_model: String,
    pub solar: SolarConfiguration,
    pub net_billing: NetBillingResult,
    /// Current bill less the net bill with solar, floored at 0.
    pub monthly_savings: f64,
    pub system_price: Option<f64>,
    pub pricing: Option<PricingBreakdown>,
    pub loan: Option<LoanPlan>,
}

impl Quote {
    /// Runs the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns a `FinanceError` if a price is available and the selected bank
    /// is not in the financing table.
    pub fn compute(config: &QuoteConfig, inputs: &QuoteInputs) -> Result<Self, FinanceError> {
        let calculator = TariffCalculator::new(&config.tariff);
        let estimator = UsageEstimator::new(calculator);
        let sizer = SolarSizer::new(&config.solar);
        let projector = NetBillingProjector::new(calculator);
        let pricing_engine = PricingEngine::new(config.pricing);
        let financing = FinancingEngine::new(&config.financing);

        let usage = estimator.estimate(inputs.bill_amount, inputs.surcharge_rate);
        let bill = calculator.calculate(usage, inputs.surcharge_rate);
        let solar = sizer.size(usage, inputs.peak_sun_hours);
        let net_billing = projector.project(
            usage,
            solar.monthly_generation_kwh,
            inputs.self_consumption_percent / 100.0,
            inputs.surcharge_rate,
        );
        let monthly_savings = (bill.total_bill - net_billing.net_bill).max(0.0);

        let system_price = sizer.system_price(solar.panel_count);
        let pricing = system_price.map(|price| pricing_engine.apply(price, &inputs.pricing_request()));
        let loan = pricing
            .map(|p| financing.plan(p.final_price, &inputs.bank, inputs.duration_months))
            .transpose()?;

        info!(
            bill_amount = inputs.bill_amount,
            usage_kwh = usage,
            panels = solar.panel_count,
            priced = system_price.is_some(),
            "quote computed"
        );

        Ok(Self {
            estimated_usage_kwh: usage,
            bill,
            average_cost_per_kwh: bill.average_cost_per_kwh(usage),
            panel_model: config.solar.panel_model.clone(),
            solar,
            net_billing,
            monthly_savings,
            system_price,
            pricing,
            loan,
        })
    }

    /// Line items as `(section, item, value)` rounded for presentation.
    ///
    /// Shared by the text report and CSV export so both show the same figures.
    pub fn line_items(&self) -> Vec<(&'static str, &'static str, f64)> {
        let b = self.bill.rounded();
        let n = &self.net_billing;
        let mut items = vec![
            ("usage", "estimated_kwh", currency(self.estimated_usage_kwh)),
            ("usage", "average_cost_per_kwh", unit_rate(self.average_cost_per_kwh)),
            ("bill", "energy_rate", b.effective_unit_rate),
            ("bill", "energy", b.usage_cost),
            ("bill", "capacity", b.capacity_cost),
            ("bill", "network", b.network_cost),
            ("bill", "afa", b.afa_cost),
            ("bill", "retail", b.retail_charge),
            ("bill", "kwtbb", b.kwtbb_cost),
            ("bill", "sst", b.sst_cost),
            ("bill", "eei", b.eei_cost),
            ("bill", "total", b.total_bill),
            ("solar", "panels", f64::from(self.solar.panel_count)),
            ("solar", "system_kwp", currency(self.solar.system_size_kwp)),
            ("solar", "generation_kwh", currency(self.solar.monthly_generation_kwh)),
            ("net_billing", "self_consumed_kwh", currency(n.self_consumed_kwh)),
            ("net_billing", "night_usage_kwh", currency(n.night_usage_kwh)),
            ("net_billing", "exported_kwh", currency(n.exportable_kwh)),
            ("net_billing", "unused_surplus_kwh", currency(n.unused_surplus_kwh)),
            ("net_billing", "export_rate", unit_rate(n.export_unit_rate)),
            ("net_billing", "export_value", currency(n.export_value)),
            ("net_billing", "night_bill", currency(n.night_bill)),
            ("net_billing", "net_bill", currency(n.net_bill)),
            ("net_billing", "monthly_savings", currency(self.monthly_savings)),
        ];
        if let Some(p) = &self.pricing {
            items.extend([
                ("pricing", "base_price", currency(p.base_price)),
                ("pricing", "discount_percent", p.effective_discount_percent),
                ("pricing", "discount", currency(p.discount_amount)),
                ("pricing", "fixed_rebate", currency(p.effective_fixed_rebate)),
                ("pricing", "campaign", currency(p.campaign_deduction)),
                ("pricing", "final_price", currency(p.final_price)),
            ]);
        }
        if let Some(l) = &self.loan {
            items.extend([
                ("loan", "deposit", currency(l.deposit_amount)),
                ("loan", "principal", currency(l.principal_after_deposit)),
                ("loan", "interest_percent", l.interest_rate_percent),
                ("loan", "total_repayment", currency(l.total_repayment)),
                ("loan", "months", f64::from(l.duration_months)),
                ("loan", "monthly_installment", currency(l.monthly_installment)),
            ]);
        }
        items
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.bill.rounded();
        let n = &self.net_billing;

        writeln!(f, "--- Bill ---")?;
        writeln!(f, "Estimated usage:       {:.2} kWh", self.estimated_usage_kwh)?;
        writeln!(f, "Average cost:          RM {:.4}/kWh", self.average_cost_per_kwh)?;
        writeln!(
            f,
            "Energy charge:         RM {:.2} ({:.4}/kWh)",
            b.usage_cost, b.effective_unit_rate
        )?;
        writeln!(f, "Capacity charge:       RM {:.2}", b.capacity_cost)?;
        writeln!(f, "Network charge:        RM {:.2}", b.network_cost)?;
        writeln!(f, "AFA:                   RM {:.2}", b.afa_cost)?;
        if b.retail_charge > 0.0 {
            writeln!(f, "Retail charge:         RM {:.2}", b.retail_charge)?;
        }
        writeln!(f, "KWTBB:                 RM {:.2}", b.kwtbb_cost)?;
        writeln!(f, "SST:                   RM {:.2}", b.sst_cost)?;
        if b.eei_cost < 0.0 {
            writeln!(f, "EEI rebate:            RM {:.2}", b.eei_cost)?;
        }
        writeln!(f, "Total bill:            RM {:.2}", b.total_bill)?;

        writeln!(f, "\n--- Solar ---")?;
        writeln!(
            f,
            "Recommended:           {} x {} ({:.2} kWp)",
            self.solar.panel_count, self.panel_model, self.solar.system_size_kwp
        )?;
        writeln!(f, "Monthly generation:    {:.2} kWh", self.solar.monthly_generation_kwh)?;
        writeln!(f, "Self-consumed:         {:.2} kWh", n.self_consumed_kwh)?;
        writeln!(f, "Night usage:           {:.2} kWh", n.night_usage_kwh)?;
        writeln!(
            f,
            "Exported:              {:.2} kWh @ RM {:.4} = RM {:.2}",
            n.exportable_kwh, n.export_unit_rate, n.export_value
        )?;
        writeln!(f, "Unused surplus:        {:.2} kWh", n.unused_surplus_kwh)?;
        writeln!(f, "Night bill:            RM {:.2}", n.night_bill)?;
        writeln!(f, "Net bill:              RM {:.2}", n.net_bill)?;
        writeln!(f, "Monthly savings:       RM {:.2}", self.monthly_savings)?;

        writeln!(f, "\n--- Price ---")?;
        match (&self.pricing, &self.loan) {
            (Some(p), loan) => {
                writeln!(f, "System price:          RM {:.2}", p.base_price)?;
                writeln!(
                    f,
                    "Discount:              RM {:.2} ({:.1}%)",
                    p.discount_amount, p.effective_discount_percent
                )?;
                writeln!(f, "Fixed rebate:          RM {:.2}", p.effective_fixed_rebate)?;
                writeln!(f, "Campaign:              RM {:.2}", p.campaign_deduction)?;
                write!(f, "Final price:           RM {:.2}", p.final_price)?;
                if let Some(l) = loan {
                    writeln!(f)?;
                    writeln!(f, "\n--- Installment ({}) ---", l.bank)?;
                    writeln!(f, "Deposit (5%):          RM {:.2}", l.deposit_amount)?;
                    writeln!(
                        f,
                        "Financed:              RM {:.2} at {:.2}% flat",
                        l.principal_after_deposit, l.interest_rate_percent
                    )?;
                    writeln!(f, "Total repayment:       RM {:.2}", l.total_repayment)?;
                    write!(
                        f,
                        "Monthly installment:   RM {:.2} x {} months",
                        l.monthly_installment, l.duration_months
                    )?;
                }
                Ok(())
            }
            (None, _) => write!(
                f,
                "No price available for {} panels",
                self.solar.panel_count
            ),
        }
    }
}

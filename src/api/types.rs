//! API query and response types.
//!
//! Query parameter names are the short forms used on the command line;
//! every figure in a response is rounded the same way as the text report.

use serde::{Deserialize, Serialize};

use crate::finance::{LoanPlan, PricingBreakdown};
use crate::quote::{Quote, QuoteInputs};
use crate::rounding;
use crate::solar::{NetBillingResult, SolarConfiguration};
use crate::tariff::TariffBreakdown;

/// Query parameters for `GET /quote`; omitted values use the quote defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteQuery {
    pub bill: Option<f64>,
    pub surcharge: Option<f64>,
    pub peak_hours: Option<f64>,
    pub self_consumption: Option<f64>,
    pub discount: Option<f64>,
    pub rebate: Option<f64>,
    pub campaign: Option<f64>,
    pub bank: Option<String>,
    pub months: Option<u32>,
}

impl From<QuoteQuery> for QuoteInputs {
    fn from(q: QuoteQuery) -> Self {
        let d = QuoteInputs::default();
        Self {
            bill_amount: q.bill.unwrap_or(d.bill_amount),
            surcharge_rate: q.surcharge.unwrap_or(d.surcharge_rate),
            peak_sun_hours: q.peak_hours.unwrap_or(d.peak_sun_hours),
            self_consumption_percent: q.self_consumption.unwrap_or(d.self_consumption_percent),
            discount_percent: q.discount.unwrap_or(d.discount_percent),
            fixed_rebate: q.rebate.unwrap_or(d.fixed_rebate),
            campaign_deduction: q.campaign.unwrap_or(d.campaign_deduction),
            bank: q.bank.unwrap_or(d.bank),
            duration_months: q.months.unwrap_or(d.duration_months),
        }
    }
}

/// Quote response: the inputs used plus every derived figure.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub inputs: QuoteInputs,
    pub estimated_usage_kwh: f64,
    pub average_cost_per_kwh: f64,
    pub bill: TariffBreakdown,
    pub panel_model: String,
    pub solar: SolarConfiguration,
    pub net_billing: NetBillingResult,
    pub monthly_savings: f64,
    /// `null` when the panel count has no quoted price.
    pub system_price: Option<f64>,
    pub pricing: Option<PricingBreakdown>,
    pub loan: Option<LoanPlan>,
}

impl QuoteResponse {
    pub fn new(inputs: QuoteInputs, quote: Quote) -> Self {
        Self {
            inputs,
            estimated_usage_kwh: rounding::currency(quote.estimated_usage_kwh),
            average_cost_per_kwh: rounding::unit_rate(quote.average_cost_per_kwh),
            bill: quote.bill.rounded(),
            panel_model: quote.panel_model,
            solar: quote.solar.rounded(),
            net_billing: quote.net_billing.rounded(),
            monthly_savings: rounding::currency(quote.monthly_savings),
            system_price: quote.system_price.map(rounding::currency),
            pricing: quote.pricing.map(|p| p.rounded()),
            loan: quote.loan.as_ref().map(LoanPlan::rounded),
        }
    }
}

/// One bank and its installment durations, ascending.
#[derive(Debug, Serialize)]
pub struct BankSummary {
    pub name: String,
    pub durations: Vec<u32>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

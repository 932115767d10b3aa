use serde::Serialize;

use crate::config::PricingConfig;
use crate::rounding::currency;

/// Adjustments the salesperson asks for; each is capped or floored before use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PricingRequest {
    pub discount_percent: f64,
    pub fixed_rebate: f64,
    /// Campaign voucher deducted after discount and rebate, uncapped.
    pub campaign_deduction: f64,
}

/// System price after discount, rebate and campaign deduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingBreakdown {
    pub base_price: f64,
    pub effective_discount_percent: f64,
    pub discount_amount: f64,
    pub effective_fixed_rebate: f64,
    pub campaign_deduction: f64,
    /// Never negative.
    pub final_price: f64,
}

impl PricingBreakdown {
    /// Copy with every amount rounded to sen.
    pub fn rounded(&self) -> Self {
        Self {
            base_price: currency(self.base_price),
            effective_discount_percent: currency(self.effective_discount_percent),
            discount_amount: currency(self.discount_amount),
            effective_fixed_rebate: currency(self.effective_fixed_rebate),
            campaign_deduction: currency(self.campaign_deduction),
            final_price: currency(self.final_price),
        }
    }
}

/// Applies tiered discount and rebate caps to a base system price.
#[derive(Debug, Clone, Copy)]
pub struct PricingEngine {
    rules: PricingConfig,
}

impl PricingEngine {
    pub fn new(rules: PricingConfig) -> Self {
        Self { rules }
    }

    /// Largest discount percentage allowed for a base price.
    pub fn discount_cap_percent(&self, base_price: f64) -> f64 {
        let r = &self.rules;
        if base_price > r.high_price_threshold {
            r.high_discount_cap_percent
        } else if base_price >= r.mid_price_threshold {
            r.mid_discount_cap_percent
        } else {
            r.base_discount_cap_percent
        }
    }

    /// Largest fixed rebate allowed, judged on the price after the
    /// percentage discount. No rebate applies to a zero-priced system.
    pub fn rebate_cap(&self, base_price: f64, discounted_price: f64) -> f64 {
        let r = &self.rules;
        if base_price <= 0.0 {
            0.0
        } else if discounted_price < r.rebate_price_threshold {
            r.rebate_cap_below_threshold
        } else {
            r.rebate_cap_at_or_above_threshold
        }
    }

    /// Stacks discount, then rebate, then campaign deduction.
    ///
    /// Negative requests are treated as zero; the final price is floored at 0.
    pub fn apply(&self, base_price: f64, request: &PricingRequest) -> PricingBreakdown {
        let base_price = base_price.max(0.0);
        let requested_discount = request.discount_percent.max(0.0);
        let requested_rebate = request.fixed_rebate.max(0.0);
        let campaign_deduction = request.campaign_deduction.max(0.0);

        let effective_discount_percent =
            requested_discount.min(self.discount_cap_percent(base_price));
        let discount_amount = base_price * effective_discount_percent / 100.0;
        let discounted = base_price - discount_amount;

        let effective_fixed_rebate = requested_rebate.min(self.rebate_cap(base_price, discounted));
        let final_price = (discounted - effective_fixed_rebate - campaign_deduction).max(0.0);

        PricingBreakdown {
            base_price,
            effective_discount_percent,
            discount_amount,
            effective_fixed_rebate,
            campaign_deduction,
            final_price,
        }
    }
}

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::FinancingConfig;
use crate::error::FinanceError;
use crate::rounding::currency;

/// Share of the final price paid up front.
pub const DEPOSIT_FRACTION: f64 = 0.05;

/// Equal-installment plan with flat interest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanPlan {
    pub bank: String,
    pub deposit_amount: f64,
    pub principal_after_deposit: f64,
    /// Principal plus flat interest.
    pub total_repayment: f64,
    pub monthly_installment: f64,
    /// Duration actually used, after any fallback.
    pub duration_months: u32,
    pub interest_rate_percent: f64,
}

impl LoanPlan {
    /// Copy with every amount rounded to sen.
    pub fn rounded(&self) -> Self {
        Self {
            bank: self.bank.clone(),
            deposit_amount: currency(self.deposit_amount),
            principal_after_deposit: currency(self.principal_after_deposit),
            total_repayment: currency(self.total_repayment),
            monthly_installment: currency(self.monthly_installment),
            duration_months: self.duration_months,
            interest_rate_percent: currency(self.interest_rate_percent),
        }
    }
}

/// Flat-interest installment calculator over a bank rate table.
#[derive(Debug, Clone)]
pub struct FinancingEngine {
    banks: BTreeMap<String, BTreeMap<u32, f64>>,
}

impl FinancingEngine {
    pub fn new(config: &FinancingConfig) -> Self {
        let banks = config
            .banks
            .iter()
            .map(|bank| {
                let plans = bank
                    .plans
                    .iter()
                    .map(|p| (p.months, p.rate_percent))
                    .collect();
                (bank.name.clone(), plans)
            })
            .collect();
        Self { banks }
    }

    /// Bank names in sorted order.
    pub fn banks(&self) -> impl Iterator<Item = &str> {
        self.banks.keys().map(String::as_str)
    }

    /// Durations offered by `bank`, ascending.
    ///
    /// # Errors
    ///
    /// Returns `FinanceError::UnknownBank` if the bank is not in the table.
    pub fn available_durations(&self, bank: &str) -> Result<Vec<u32>, FinanceError> {
        Ok(self.plans(bank)?.keys().copied().collect())
    }

    /// Duration that will be used for a request: the requested one if the
    /// bank offers it, otherwise the bank's longest.
    ///
    /// # Errors
    ///
    /// Returns an error if the bank is unknown or offers no plans.
    pub fn resolve_duration(&self, bank: &str, months: u32) -> Result<u32, FinanceError> {
        let plans = self.plans(bank)?;
        if plans.contains_key(&months) {
            return Ok(months);
        }
        plans
            .keys()
            .next_back()
            .copied()
            .ok_or_else(|| FinanceError::NoPlans(bank.to_string()))
    }

    /// Builds the installment plan for `final_price`.
    ///
    /// Deposit is 5 % of the price; the flat rate is charged once on the
    /// remainder and spread evenly. A zero-month plan reports a zero
    /// installment.
    ///
    /// # Errors
    ///
    /// Returns an error if the bank is unknown or offers no plans.
    pub fn plan(&self, final_price: f64, bank: &str, months: u32) -> Result<LoanPlan, FinanceError> {
        let duration_months = self.resolve_duration(bank, months)?;
        let interest_rate_percent = self
            .plans(bank)?
            .get(&duration_months)
            .copied()
            .unwrap_or(0.0);

        let final_price = final_price.max(0.0);
        let deposit_amount = final_price * DEPOSIT_FRACTION;
        let principal_after_deposit = final_price - deposit_amount;
        let total_repayment = principal_after_deposit * (1.0 + interest_rate_percent / 100.0);
        let monthly_installment = if duration_months > 0 {
            total_repayment / f64::from(duration_months)
        } else {
            0.0
        };

        Ok(LoanPlan {
            bank: bank.to_string(),
            deposit_amount,
            principal_after_deposit,
            total_repayment,
            monthly_installment,
            duration_months,
            interest_rate_percent,
        })
    }

    fn plans(&self, bank: &str) -> Result<&BTreeMap<u32, f64>, FinanceError> {
        self.banks.get(bank).ok_or_else(|| FinanceError::UnknownBank {
            name: bank.to_string(),
            available: self.banks().collect::<Vec<_>>().join(", "),
        })
    }
}

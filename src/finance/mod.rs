//! System pricing and installment financing.

/// Deposit and flat-interest installment plans.
pub mod loan;
/// Discount, rebate and campaign stacking.
pub mod pricing;

pub use loan::{DEPOSIT_FRACTION, FinancingEngine, LoanPlan};
pub use pricing::{PricingBreakdown, PricingEngine, PricingRequest};

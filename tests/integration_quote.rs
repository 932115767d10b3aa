mod common;

use std::path::Path;

use solar_quote::config::QuoteConfig;
use solar_quote::error::FinanceError;
use solar_quote::quote::{Quote, QuoteInputs};
use solar_quote::tariff::TariffCalculator;

use common::{assert_close, default_config, inputs_for_bill};

#[test]
fn thousand_kwh_bill_end_to_end() {
    let config = default_config();
    let quote = Quote::compute(&config, &inputs_for_bill(471.173882)).expect("quote");

    assert_close(quote.estimated_usage_kwh, 1000.0, 1e-3, "usage");
    assert_close(quote.bill.total_bill, 471.173882, 1e-5, "recomputed bill");

    // 620 W at 3.4 h -> 63.24 kWh per panel per month
    assert_eq!(quote.solar.panel_count, 16);
    assert_close(quote.solar.system_size_kwp, 9.92, 1e-9, "kWp");
    assert_close(quote.solar.monthly_generation_kwh, 1011.84, 1e-6, "generation");

    let net = &quote.net_billing;
    assert_close(net.self_consumed_kwh, 300.0, 1e-3, "self consumed");
    assert_close(net.night_usage_kwh, 700.0, 1e-3, "night usage");
    assert_close(net.exportable_kwh, 700.0, 1e-3, "export capped at night usage");
    assert_close(net.unused_surplus_kwh, 11.84, 1e-3, "unused surplus");
    assert!(quote.monthly_savings > 0.0);

    assert_eq!(quote.system_price, Some(30_888.0));
    let pricing = quote.pricing.expect("priced");
    assert_eq!(pricing.final_price, 30_888.0);

    let loan = quote.loan.expect("financed");
    assert_eq!(loan.bank, "MBB (Maybank)");
    assert_eq!(loan.duration_months, 60);
    assert_close(loan.deposit_amount, 1_544.4, 1e-6, "deposit");
    assert_close(loan.principal_after_deposit, 29_343.6, 1e-6, "principal");
    assert_close(loan.total_repayment, 31_691.088, 1e-6, "total repayment");
    assert_close(loan.monthly_installment, 528.1848, 1e-6, "installment");
}

#[test]
fn zero_bill_yields_empty_quote() {
    let quote = Quote::compute(&default_config(), &inputs_for_bill(0.0)).expect("quote");
    assert_eq!(quote.estimated_usage_kwh, 0.0);
    assert_eq!(quote.bill.total_bill, 0.0);
    assert_eq!(quote.solar.panel_count, 0);
    assert_eq!(quote.net_billing.net_bill, 0.0);
    assert_eq!(quote.monthly_savings, 0.0);
    assert!(quote.system_price.is_none());
    assert!(quote.loan.is_none());
}

#[test]
fn small_system_has_no_price() {
    // roughly 100 kWh needs 2 panels, below the priced range
    let quote = Quote::compute(&default_config(), &inputs_for_bill(20.0)).expect("quote");
    assert!(quote.solar.panel_count < 8);
    assert!(quote.system_price.is_none());
    assert!(quote.pricing.is_none());
    assert!(quote.loan.is_none());
    assert!(quote.to_string().contains("No price available"));
}

#[test]
fn usage_tier_edges() {
    let config = default_config();
    let calc = TariffCalculator::new(&config.tariff);

    let at_600 = calc.calculate(600.0, 0.0);
    assert_eq!(at_600.retail_charge, 0.0);
    assert_eq!(at_600.sst_cost, 0.0);
    assert_close(at_600.total_bill, 216.84528, 1e-6, "600 kWh");

    let at_601 = calc.calculate(601.0, 0.0);
    assert_eq!(at_601.retail_charge, 10.0);
    assert!(at_601.sst_cost > 0.0);
    assert_close(at_601.total_bill, 236.259133, 1e-5, "601 kWh");

    let at_1500 = calc.calculate(1500.0, 0.0);
    let at_1501 = calc.calculate(1501.0, 0.0);
    assert_close(at_1500.effective_unit_rate, 0.2703, 1e-12, "base tier");
    assert_close(at_1501.effective_unit_rate, 0.3703, 1e-12, "high tier");
    assert_close(at_1500.total_bill, 720.094634, 1e-5, "1500 kWh");
    assert_close(at_1501.total_bill, 880.407296, 1e-5, "1501 kWh");
}

#[test]
fn bill_in_retail_jump_snaps_to_nearer_edge() {
    let config = default_config();
    // just above 216.85 (600 kWh) and well short of 235.85 (600+ kWh)
    let quote = Quote::compute(&config, &inputs_for_bill(220.0)).expect("quote");
    assert!(quote.estimated_usage_kwh <= 600.0);
    assert_close(quote.estimated_usage_kwh, 600.0, 1e-4, "snapped usage");

    let quote = Quote::compute(&config, &inputs_for_bill(234.0)).expect("quote");
    assert!(quote.estimated_usage_kwh > 600.0);
    assert_close(quote.estimated_usage_kwh, 600.0, 1e-4, "snapped usage");
}

#[test]
fn surcharge_changes_estimated_usage() {
    let config = default_config();
    let rebate = QuoteInputs {
        surcharge_rate: -0.02,
        ..inputs_for_bill(300.0)
    };
    let surcharge = QuoteInputs {
        surcharge_rate: 0.10,
        ..inputs_for_bill(300.0)
    };
    let low = Quote::compute(&config, &surcharge).expect("quote");
    let high = Quote::compute(&config, &rebate).expect("quote");
    assert!(high.estimated_usage_kwh > low.estimated_usage_kwh);
}

#[test]
fn unknown_bank_is_reported() {
    let inputs = QuoteInputs {
        bank: "Nope Bank".to_string(),
        ..inputs_for_bill(471.173882)
    };
    let err = Quote::compute(&default_config(), &inputs).unwrap_err();
    match err {
        FinanceError::UnknownBank { name, available } => {
            assert_eq!(name, "Nope Bank");
            assert!(available.contains("CIMB"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_duration_uses_longest_plan() {
    let inputs = QuoteInputs {
        bank: "CIMB".to_string(),
        duration_months: 60,
        ..inputs_for_bill(471.173882)
    };
    let quote = Quote::compute(&default_config(), &inputs).expect("quote");
    let loan = quote.loan.expect("financed");
    assert_eq!(loan.duration_months, 36);
    assert_eq!(loan.interest_rate_percent, 5.5);
}

#[test]
fn discounts_are_capped() {
    let inputs = QuoteInputs {
        discount_percent: 50.0,
        fixed_rebate: 5_000.0,
        campaign_deduction: 500.0,
        ..inputs_for_bill(471.173882)
    };
    let quote = Quote::compute(&default_config(), &inputs).expect("quote");
    let p = quote.pricing.expect("priced");
    // 30 888 sits in the 6 % band; the discounted price keeps the 600 rebate cap
    assert_eq!(p.effective_discount_percent, 6.0);
    assert_close(p.discount_amount, 1_853.28, 1e-6, "discount");
    assert_eq!(p.effective_fixed_rebate, 600.0);
    assert_close(p.final_price, 30_888.0 - 1_853.28 - 600.0 - 500.0, 1e-6, "final");
}

#[test]
fn shipped_config_matches_builtin_tables() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/tnb_2025.toml");
    let from_file = QuoteConfig::from_toml_file(&path).expect("config file should parse");
    assert!(from_file.validate().is_empty());

    let builtin = default_config();
    for bill in [0.0, 45.0, 300.0, 471.173882, 900.0, 2500.0] {
        let a = Quote::compute(&from_file, &inputs_for_bill(bill)).expect("quote");
        let b = Quote::compute(&builtin, &inputs_for_bill(bill)).expect("quote");
        assert_eq!(a, b, "quotes differ for bill {bill}");
    }
}

#[test]
fn no_eei_preset_raises_small_bills() {
    let with = default_config();
    let without = QuoteConfig::from_preset("no_eei").expect("preset");
    let a = TariffCalculator::new(&with.tariff).calculate(300.0, 0.0);
    let b = TariffCalculator::new(&without.tariff).calculate(300.0, 0.0);
    assert!(a.eei_cost < 0.0);
    assert_eq!(b.eei_cost, 0.0);
    assert!(b.total_bill > a.total_bill);
}

#[test]
fn enormous_bill_is_not_sized() {
    let quote = Quote::compute(&default_config(), &inputs_for_bill(1.0e12)).expect("quote");
    assert!(quote.estimated_usage_kwh.is_finite());
    assert!(quote.estimated_usage_kwh > 1.0e12);
    assert_eq!(quote.solar.panel_count, 0);
    assert!(quote.system_price.is_none());
    assert!(quote.loan.is_none());
}

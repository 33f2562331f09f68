use autodeal_core::loan::{amortization_schedule, calculate_loan, compute_loan, LoanInputs};
use autodeal_core::AutoDealError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

// ===========================================================================
// Loan engine tests
// ===========================================================================

#[test]
fn test_scenario_b_matches_worksheet() {
    let calc = compute_loan(&LoanInputs::default()).unwrap();

    assert_eq!(calc.taxable_amount, dec!(43000));
    assert_eq!(calc.sales_tax, dec!(3332.5));
    assert_eq!(calc.total_fees, dec!(649));
    assert_eq!(calc.total_price, dec!(46981.5));
    assert_eq!(calc.total_credits, dec!(5000));
    assert_eq!(calc.amount_financed, dec!(41981.5));
    assert_close(calc.monthly_payment, dec!(821.42), dec!(0.005));
    assert_close(calc.total_interest, dec!(7303.48), dec!(0.01));
    assert_eq!(calc.total_cost, calc.total_paid + dec!(5000));
}

#[test]
fn test_trade_in_value_reduces_taxable_amount() {
    let calc = compute_loan(&LoanInputs {
        trade_in_value: dec!(10000),
        trade_in_payoff: dec!(4000),
        ..LoanInputs::default()
    })
    .unwrap();
    assert_eq!(calc.taxable_amount, dec!(33000));
    assert_eq!(calc.sales_tax, dec!(2557.5));
    // Positive equity of 6,000 is a credit
    assert_eq!(calc.total_credits, dec!(11000));
}

#[test]
fn test_trade_in_above_price_floors_taxable_at_zero() {
    let calc = compute_loan(&LoanInputs {
        vehicle_price: dec!(8000),
        trade_in_value: dec!(9000),
        ..LoanInputs::default()
    })
    .unwrap();
    assert_eq!(calc.taxable_amount, Decimal::ZERO);
    assert_eq!(calc.sales_tax, Decimal::ZERO);
}

#[test]
fn test_negative_equity_adds_exact_shortfall() {
    let underwater = compute_loan(&LoanInputs {
        trade_in_value: dec!(5000),
        trade_in_payoff: dec!(8000),
        ..LoanInputs::default()
    })
    .unwrap();
    let break_even = compute_loan(&LoanInputs {
        trade_in_value: dec!(5000),
        trade_in_payoff: dec!(5000),
        ..LoanInputs::default()
    })
    .unwrap();
    assert_eq!(
        underwater.amount_financed - break_even.amount_financed,
        dec!(3000)
    );
}

#[test]
fn test_zero_rate_has_no_interest() {
    let calc = compute_loan(&LoanInputs {
        interest_rate: Decimal::ZERO,
        term: 36,
        ..LoanInputs::default()
    })
    .unwrap();
    assert_eq!(calc.monthly_payment, calc.amount_financed / dec!(36));
    assert_eq!(calc.total_interest, Decimal::ZERO);
}

#[test]
fn test_overpayment_is_not_clamped() {
    let output = calculate_loan(&LoanInputs {
        vehicle_price: dec!(10000),
        down_payment: dec!(15000),
        ..LoanInputs::default()
    })
    .unwrap();
    assert!(output.result.amount_financed < Decimal::ZERO);
    assert!(output.result.monthly_payment < Decimal::ZERO);
    assert!(output.warnings.iter().any(|w| w.contains("overpayment")));
}

#[test]
fn test_drive_off_includes_first_payment_fees_and_tax() {
    let calc = compute_loan(&LoanInputs::default()).unwrap();
    assert_eq!(
        calc.drive_off(),
        dec!(5000) + calc.monthly_payment + dec!(649) + dec!(3332.5)
    );
}

#[test]
fn test_negative_interest_rate_rejected() {
    let err = calculate_loan(&LoanInputs {
        interest_rate: dec!(-1),
        ..LoanInputs::default()
    })
    .unwrap_err();
    match err {
        AutoDealError::InvalidInput { field, .. } => assert_eq!(field, "interest_rate"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_zero_term_rejected() {
    assert!(calculate_loan(&LoanInputs {
        term: 0,
        ..LoanInputs::default()
    })
    .is_err());
}

#[test]
fn test_partial_json_uses_defaults() {
    let inputs: LoanInputs =
        serde_json::from_str(r#"{"vehicle_price": "30000", "term": 48}"#).unwrap();
    assert_eq!(inputs.vehicle_price, dec!(30000));
    assert_eq!(inputs.term, 48);
    assert_eq!(inputs.interest_rate, dec!(6.5));
}

// ===========================================================================
// Amortization tests
// ===========================================================================

#[test]
fn test_schedule_first_month_split() {
    let calc = compute_loan(&LoanInputs::default()).unwrap();
    let schedule = amortization_schedule(&calc);

    let first = &schedule[0];
    assert_eq!(first.month, 1);
    // 41,981.50 × 6.5% / 12
    assert_close(first.interest, dec!(227.40), dec!(0.01));
    assert_close(first.principal, dec!(594.02), dec!(0.01));
    assert_eq!(first.ending_balance, schedule[1].beginning_balance);
}

#[test]
fn test_schedule_pays_off_at_term() {
    let calc = compute_loan(&LoanInputs {
        term: 72,
        interest_rate: dec!(9),
        ..LoanInputs::default()
    })
    .unwrap();
    let schedule = amortization_schedule(&calc);
    assert_eq!(schedule.len(), 72);
    assert_close(schedule[71].ending_balance, Decimal::ZERO, dec!(0.000001));
}

#[test]
fn test_unbounded_zero_rate_term_is_rejected() {
    let err = calculate_loan(&LoanInputs {
        interest_rate: Decimal::ZERO,
        term: u32::MAX,
        ..LoanInputs::default()
    })
    .unwrap_err();
    match err {
        AutoDealError::InvalidInput { field, reason } => {
            assert_eq!(field, "term");
            assert!(reason.contains("1200-month limit"));
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_longest_allowed_term_still_schedules() {
    let calc = compute_loan(&LoanInputs {
        term: autodeal_core::MAX_TERM_MONTHS,
        ..LoanInputs::default()
    })
    .unwrap();
    let schedule = amortization_schedule(&calc);
    assert_eq!(schedule.len(), 1200);
}

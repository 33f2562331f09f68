#![cfg(feature = "rates")]

use autodeal_core::comparison::{compute_comparison, ComparisonInputs};
use autodeal_core::lease::{compute_lease, LeaseInputs};
use autodeal_core::rates::{self, RateSubmission, SubmissionSource, DEFAULT_MILEAGE};
use autodeal_core::AutoDealError;
use rust_decimal_macros::dec;

// ===========================================================================
// Rate table tests
// ===========================================================================

#[test]
fn test_every_record_has_a_selection() {
    for record in rates::vehicle_rates().unwrap() {
        let selection = record.selection(DEFAULT_MILEAGE).unwrap();
        assert_eq!(selection.msrp, record.msrp_range.min);
        assert!(selection.money_factor > dec!(0));
        assert!(record.msrp_range.min <= record.msrp_range.max);
    }
}

#[test]
fn test_search_is_case_insensitive() {
    let hits = rates::search("bmw x").unwrap();
    let models: Vec<&str> = hits.iter().map(|v| v.model.as_str()).collect();
    assert!(models.contains(&"X3"));
    assert!(models.contains(&"X5"));
    assert!(models.iter().all(|m| m.starts_with('X')));
}

#[test]
fn test_every_make_has_models() {
    for make in rates::makes().unwrap() {
        assert!(!rates::models_by_make(&make).unwrap().is_empty());
    }
}

#[test]
fn test_select_unknown_vehicle() {
    let err = rates::select_vehicle("Tesla", "Cybertruck", DEFAULT_MILEAGE).unwrap_err();
    assert!(matches!(err, AutoDealError::NotFound(_)));
}

#[test]
fn test_selected_rates_drive_the_lease() {
    let selection = rates::select_vehicle("Toyota", "RAV4", DEFAULT_MILEAGE).unwrap();
    let inputs = selection.apply_to_lease(&LeaseInputs::default());
    let calc = compute_lease(&inputs);

    assert_eq!(calc.inputs.msrp, selection.msrp);
    assert_eq!(
        calc.residual_value,
        selection.msrp * selection.residual_percent / dec!(100)
    );
}

#[test]
fn test_selected_rates_drive_the_comparison() {
    let selection = rates::select_vehicle("Honda", "Accord", DEFAULT_MILEAGE).unwrap();
    let inputs = selection.apply_to_comparison(&ComparisonInputs::default());
    assert_eq!(inputs.lease_money_factor, selection.money_factor);
    assert_eq!(inputs.selling_price, selection.msrp);
    assert_eq!(inputs.down_payment, dec!(3000));
    let cmp = compute_comparison(&inputs).unwrap();
    assert_eq!(cmp.loan.vehicle_value, selection.msrp);
}

// ===========================================================================
// Submission tests
// ===========================================================================

#[test]
fn test_submission_round_trip_from_json() {
    let json = r#"{
        "make": "Kia", "model": "Telluride", "year": 2025, "trim": "EX",
        "msrp": "42000", "money_factor": "0.0021", "residual_percent": "58",
        "term": 39, "mileage": 12000, "region": "Northeast",
        "source": "dealer_quote", "notes": "Quoted before incentives"
    }"#;
    let submission: RateSubmission = serde_json::from_str(json).unwrap();
    assert_eq!(submission.source, SubmissionSource::DealerQuote);

    let receipt = rates::submit_rate(&submission).unwrap();
    assert!(receipt.accepted);
}

#[test]
fn test_submission_without_make_rejected() {
    let json = r#"{
        "make": "", "model": "Telluride", "year": 2025,
        "msrp": "42000", "money_factor": "0.0021", "residual_percent": "58",
        "source": "dealer_quote"
    }"#;
    let submission: RateSubmission = serde_json::from_str(json).unwrap();
    match rates::submit_rate(&submission).unwrap_err() {
        AutoDealError::InvalidInput { field, .. } => assert_eq!(field, "make"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

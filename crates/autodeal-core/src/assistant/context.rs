//! Plain-text snapshots of calculator state for the assistant's context.

use crate::comparison::lease_vs_buy::ComparisonOutput;
use crate::lease::calculator::LeaseCalculation;
use crate::loan::calculator::LoanCalculation;
use crate::types::{format_currency, format_currency_detailed};

pub fn lease_snapshot(calc: &LeaseCalculation) -> String {
    let i = &calc.inputs;
    [
        "Lease calculator:".to_string(),
        format!("- MSRP: {}", format_currency(i.msrp)),
        format!("- Selling price: {}", format_currency(i.selling_price)),
        format!("- Down payment: {}", format_currency(i.down_payment)),
        format!(
            "- Trade-in: {} value, {} payoff",
            format_currency(i.trade_in_value),
            format_currency(i.trade_in_payoff)
        ),
        format!("- Rebates: {}", format_currency(i.rebates)),
        format!(
            "- Money factor: {} (≈{}% APR)",
            i.money_factor,
            calc.effective_apr.round_dp(2)
        ),
        format!(
            "- Residual: {}% ({})",
            i.residual_percent,
            format_currency(calc.residual_value)
        ),
        format!("- Term: {} months", i.term),
        format!(
            "- Fees: {} acquisition, {} doc; tax {}%",
            format_currency(i.acquisition_fee),
            format_currency(i.doc_fee),
            i.tax_rate
        ),
        format!("- Adjusted cap cost: {}", format_currency(calc.adjusted_cap_cost)),
        format!(
            "- Monthly payment: {}",
            format_currency_detailed(calc.monthly_payment)
        ),
        format!("- Drive-off: {}", format_currency(calc.drive_off)),
        format!("- Total cost: {}", format_currency(calc.total_cost)),
    ]
    .join("\n")
}

pub fn loan_snapshot(calc: &LoanCalculation) -> String {
    let i = &calc.inputs;
    [
        "Loan calculator:".to_string(),
        format!("- Vehicle price: {}", format_currency(i.vehicle_price)),
        format!("- Down payment: {}", format_currency(i.down_payment)),
        format!(
            "- Trade-in: {} value, {} payoff",
            format_currency(i.trade_in_value),
            format_currency(i.trade_in_payoff)
        ),
        format!("- Rebates: {}", format_currency(i.rebates)),
        format!("- Interest rate: {}% for {} months", i.interest_rate, i.term),
        format!(
            "- Sales tax: {} at {}%; fees {}",
            format_currency(calc.sales_tax),
            i.tax_rate,
            format_currency(calc.total_fees)
        ),
        format!("- Amount financed: {}", format_currency(calc.amount_financed)),
        format!(
            "- Monthly payment: {}",
            format_currency_detailed(calc.monthly_payment)
        ),
        format!("- Total interest: {}", format_currency(calc.total_interest)),
        format!("- Total cost: {}", format_currency(calc.total_cost)),
    ]
    .join("\n")
}

pub fn comparison_snapshot(cmp: &ComparisonOutput) -> String {
    [
        "Lease vs. buy:".to_string(),
        format!(
            "- Lease: {}/mo for {} months, {} drive-off, {} total",
            format_currency_detailed(cmp.lease.monthly_payment),
            cmp.lease.term,
            format_currency(cmp.lease.drive_off),
            format_currency(cmp.lease.total_cost)
        ),
        format!(
            "- Finance: {}/mo for {} months, {} financed, {} total interest",
            format_currency_detailed(cmp.loan.monthly_payment),
            cmp.loan.term,
            format_currency(cmp.loan.amount_financed),
            format_currency(cmp.loan.total_interest)
        ),
        format!(
            "- After {} months the loan has cost {} and left {} in equity",
            cmp.horizon.horizon_months,
            format_currency(cmp.horizon.loan_paid),
            format_currency(cmp.horizon.loan_equity)
        ),
        format!("- Recommendation: {}", cmp.recommendation.reason),
    ]
    .join("\n")
}

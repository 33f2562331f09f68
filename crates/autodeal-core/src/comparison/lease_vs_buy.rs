//! Side-by-side lease vs. finance comparison for the same vehicle.
//!
//! Both deals are priced from one set of inputs. The loan is then walked
//! forward over a fixed comparison horizon to see what it costs, and what
//! equity it leaves, by the time the lease would be turned in.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::lease::calculator::{compute_lease, LeaseCalculation, LeaseInputs};
use crate::loan::calculator::{compute_loan, LoanCalculation, LoanInputs};
use crate::time_value::remaining_balance_after;
use crate::types::{format_currency, with_metadata, ComputationOutput, Money, MoneyFactor, Percent};
use crate::validation::{require_non_negative, require_term};
use crate::AutoDealResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Loan months projected for the equal-footing comparison. Deliberately not
/// tied to `lease_term`.
pub const COMPARISON_HORIZON_MONTHS: u32 = 36;

/// Share of the selling price the vehicle is assumed to retain at the horizon.
const RETAINED_VALUE_SHARE: Decimal = dec!(0.6);

const LEASE_MONTHLY_SAVINGS_THRESHOLD: Decimal = dec!(100);
const LEASE_NET_COST_THRESHOLD: Decimal = dec!(2000);
const BUY_EQUITY_SHARE_OF_LEASE_COST: Decimal = dec!(0.3);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// One form driving both the lease and the loan.
///
/// Missing fields deserialize to the values of [`ComparisonInputs::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonInputs {
    pub msrp: Money,
    /// Negotiated price; used as the loan's vehicle price
    pub selling_price: Money,
    pub down_payment: Money,
    pub trade_in_value: Money,
    pub trade_in_payoff: Money,
    pub rebates: Money,
    /// Sales tax in percent, applied per each side's convention
    pub tax_rate: Percent,
    pub doc_fee: Money,
    pub lease_money_factor: MoneyFactor,
    pub lease_residual_percent: Percent,
    pub lease_term: u32,
    pub acquisition_fee: Money,
    /// Annual loan rate in percent
    pub loan_interest_rate: Percent,
    pub loan_term: u32,
    pub title_fee: Money,
}

impl Default for ComparisonInputs {
    fn default() -> Self {
        Self {
            msrp: dec!(45000),
            selling_price: dec!(43000),
            down_payment: dec!(3000),
            trade_in_value: Decimal::ZERO,
            trade_in_payoff: Decimal::ZERO,
            rebates: Decimal::ZERO,
            tax_rate: dec!(7.75),
            doc_fee: dec!(499),
            lease_money_factor: dec!(0.00125),
            lease_residual_percent: dec!(55),
            lease_term: 36,
            acquisition_fee: dec!(895),
            loan_interest_rate: dec!(6.5),
            loan_term: 60,
            title_fee: dec!(150),
        }
    }
}

impl ComparisonInputs {
    /// The lease side of the form.
    pub fn lease_inputs(&self) -> LeaseInputs {
        LeaseInputs {
            msrp: self.msrp,
            selling_price: self.selling_price,
            down_payment: self.down_payment,
            trade_in_value: self.trade_in_value,
            trade_in_payoff: self.trade_in_payoff,
            rebates: self.rebates,
            residual_percent: self.lease_residual_percent,
            money_factor: self.lease_money_factor,
            term: self.lease_term,
            acquisition_fee: self.acquisition_fee,
            doc_fee: self.doc_fee,
            tax_rate: self.tax_rate,
        }
    }

    /// The loan side of the form, financing the selling price.
    pub fn loan_inputs(&self) -> LoanInputs {
        LoanInputs {
            vehicle_price: self.selling_price,
            down_payment: self.down_payment,
            trade_in_value: self.trade_in_value,
            trade_in_payoff: self.trade_in_payoff,
            rebates: self.rebates,
            interest_rate: self.loan_interest_rate,
            term: self.loan_term,
            tax_rate: self.tax_rate,
            doc_fee: self.doc_fee,
            title_fee: self.title_fee,
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseSummary {
    pub monthly_payment: Money,
    pub drive_off: Money,
    pub total_cost: Money,
    pub effective_apr: Percent,
    pub residual_value: Money,
    pub term: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub monthly_payment: Money,
    pub drive_off: Money,
    pub total_cost: Money,
    pub total_interest: Money,
    pub amount_financed: Money,
    pub term: u32,
    /// The buyer owns the vehicle outright at payoff
    pub vehicle_value: Money,
}

/// Where the loan stands once the comparison horizon has elapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonProjection {
    /// min(36, loan term)
    pub horizon_months: u32,
    /// Lease total cost over its full term
    pub lease_cost: Money,
    /// Loan payments made through the horizon plus cash down
    pub loan_paid: Money,
    /// Loan balance still owed; negative if overpaid
    pub remaining_balance: Money,
    pub vehicle_value_after_horizon: Money,
    /// Vehicle value less any positive balance owed
    pub loan_equity: Money,
    /// Loan paid less equity retained
    pub loan_net_cost: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Lease,
    Buy,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub verdict: Verdict,
    pub reason: String,
    /// Loan monthly less lease monthly
    pub monthly_savings: Money,
    /// Loan net cost less lease total cost
    pub net_cost_difference: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub lease: LeaseSummary,
    pub loan: LoanSummary,
    pub horizon: HorizonProjection,
    pub recommendation: Recommendation,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price both deals and project the loan over the comparison horizon.
///
/// Fails when the loan side cannot be priced (see [`compute_loan`]).
///
/// # Panics
///
/// `lease_term` must be greater than zero. Use [`compare_lease_vs_buy`] when
/// the inputs have not been validated.
pub fn compute_comparison(inputs: &ComparisonInputs) -> AutoDealResult<ComparisonOutput> {
    let lease = compute_lease(&inputs.lease_inputs());
    let loan = compute_loan(&inputs.loan_inputs())?;

    let horizon = project_horizon(inputs, &lease, &loan);
    let recommendation = recommend(
        lease.monthly_payment,
        loan.monthly_payment,
        &horizon,
        inputs.lease_term,
    );

    Ok(ComparisonOutput {
        lease: LeaseSummary {
            monthly_payment: lease.monthly_payment,
            drive_off: lease.drive_off,
            total_cost: lease.total_cost,
            effective_apr: lease.effective_apr,
            residual_value: lease.residual_value,
            term: inputs.lease_term,
        },
        loan: LoanSummary {
            monthly_payment: loan.monthly_payment,
            drive_off: loan.drive_off(),
            total_cost: loan.total_cost,
            total_interest: loan.total_interest,
            amount_financed: loan.amount_financed,
            term: inputs.loan_term,
            vehicle_value: inputs.selling_price,
        },
        horizon,
        recommendation,
    })
}

/// Validate the form, run the comparison and attach advisory warnings.
pub fn compare_lease_vs_buy(
    inputs: &ComparisonInputs,
) -> AutoDealResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();

    validate_input(inputs)?;
    let output = compute_comparison(inputs)?;

    let mut warnings = Vec::new();
    if inputs.lease_term != COMPARISON_HORIZON_MONTHS {
        warnings.push(format!(
            "Loan is projected over {} months regardless of the {}-month lease term",
            output.horizon.horizon_months, inputs.lease_term
        ));
    }
    if output.loan.amount_financed < Decimal::ZERO {
        warnings.push("Credits exceed the loan's total price; amount financed is negative".into());
    }
    let net_trade_in = inputs.trade_in_value - inputs.trade_in_payoff;
    if net_trade_in < Decimal::ZERO {
        warnings.push(format!(
            "Negative equity of {} is carried into both deals",
            format_currency(net_trade_in.abs())
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Lease vs. finance over a 36-month horizon with 40% assumed depreciation",
        inputs,
        warnings,
        elapsed,
        output,
    ))
}

/// Decide between leasing and buying from the headline figures.
///
/// First match wins: a lease that is more than $100/mo cheaper *and* more
/// than $2,000 cheaper net of loan equity; otherwise buying when equity
/// exceeds 30% of the lease's total cost; otherwise a tie. Both thresholds
/// are strict.
pub fn recommend(
    lease_monthly: Money,
    loan_monthly: Money,
    horizon: &HorizonProjection,
    lease_term: u32,
) -> Recommendation {
    let monthly_savings = loan_monthly - lease_monthly;
    let net_cost_difference = horizon.loan_net_cost - horizon.lease_cost;

    let (verdict, reason) = if monthly_savings > LEASE_MONTHLY_SAVINGS_THRESHOLD
        && net_cost_difference > LEASE_NET_COST_THRESHOLD
    {
        (
            Verdict::Lease,
            format!(
                "Leasing saves {}/mo and {} over {} months",
                format_currency(monthly_savings),
                format_currency(net_cost_difference),
                lease_term
            ),
        )
    } else if horizon.loan_equity > horizon.lease_cost * BUY_EQUITY_SHARE_OF_LEASE_COST {
        (
            Verdict::Buy,
            format!(
                "Buying builds {} in equity after {} months",
                format_currency(horizon.loan_equity),
                lease_term
            ),
        )
    } else {
        (
            Verdict::Tie,
            "Both options are comparable - consider your priorities below".to_string(),
        )
    };

    Recommendation {
        verdict,
        reason,
        monthly_savings,
        net_cost_difference,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn project_horizon(
    inputs: &ComparisonInputs,
    lease: &LeaseCalculation,
    loan: &LoanCalculation,
) -> HorizonProjection {
    let horizon_months = COMPARISON_HORIZON_MONTHS.min(inputs.loan_term);

    // A horizon covering the whole loan pays exactly what the loan engine totals
    let payments_made = if horizon_months == inputs.loan_term {
        loan.total_paid
    } else {
        loan.monthly_payment * Decimal::from(horizon_months)
    };
    let loan_paid = payments_made + inputs.down_payment;
    let remaining_balance = remaining_balance_after(
        loan.amount_financed,
        loan.monthly_payment,
        loan.monthly_rate,
        horizon_months,
    );

    let vehicle_value_after_horizon = inputs.selling_price * RETAINED_VALUE_SHARE;
    let loan_equity = vehicle_value_after_horizon - remaining_balance.max(Decimal::ZERO);

    HorizonProjection {
        horizon_months,
        lease_cost: lease.total_cost,
        loan_paid,
        remaining_balance,
        vehicle_value_after_horizon,
        loan_equity,
        loan_net_cost: loan_paid - loan_equity,
    }
}

fn validate_input(inputs: &ComparisonInputs) -> AutoDealResult<()> {
    require_term("lease_term", inputs.lease_term)?;
    require_term("loan_term", inputs.loan_term)?;
    require_non_negative(&[
        ("msrp", inputs.msrp),
        ("selling_price", inputs.selling_price),
        ("down_payment", inputs.down_payment),
        ("trade_in_value", inputs.trade_in_value),
        ("trade_in_payoff", inputs.trade_in_payoff),
        ("rebates", inputs.rebates),
        ("tax_rate", inputs.tax_rate),
        ("doc_fee", inputs.doc_fee),
        ("lease_money_factor", inputs.lease_money_factor),
        ("lease_residual_percent", inputs.lease_residual_percent),
        ("acquisition_fee", inputs.acquisition_fee),
        ("loan_interest_rate", inputs.loan_interest_rate),
        ("title_fee", inputs.title_fee),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutoDealError;
    use rust_decimal_macros::dec;

    fn horizon_with(lease_cost: Money, loan_net_cost: Money, loan_equity: Money) -> HorizonProjection {
        HorizonProjection {
            horizon_months: 36,
            lease_cost,
            loan_paid: loan_net_cost + loan_equity,
            remaining_balance: Decimal::ZERO,
            vehicle_value_after_horizon: loan_equity,
            loan_equity,
            loan_net_cost,
        }
    }

    #[test]
    fn test_lease_verdict_just_over_both_thresholds() {
        let horizon = horizon_with(dec!(20000), dec!(22000.01), dec!(1000));
        let rec = recommend(dec!(500), dec!(600.01), &horizon, 36);
        assert_eq!(rec.verdict, Verdict::Lease);
        assert_eq!(rec.monthly_savings, dec!(100.01));
        assert_eq!(rec.net_cost_difference, dec!(2000.01));
    }

    #[test]
    fn test_exact_thresholds_are_not_lease() {
        let horizon = horizon_with(dec!(20000), dec!(22000), dec!(1000));
        let rec = recommend(dec!(500), dec!(600), &horizon, 36);
        assert_ne!(rec.verdict, Verdict::Lease);
        // Equity 1000 is below 30% of 20000, so this falls through to a tie
        assert_eq!(rec.verdict, Verdict::Tie);
    }

    #[test]
    fn test_only_one_lease_threshold_met() {
        let horizon = horizon_with(dec!(20000), dec!(30000), dec!(1000));
        let rec = recommend(dec!(500), dec!(550), &horizon, 36);
        assert_eq!(rec.verdict, Verdict::Tie);
    }

    #[test]
    fn test_buy_when_equity_exceeds_thirty_percent() {
        let horizon = horizon_with(dec!(20000), dec!(15000), dec!(6000.01));
        let rec = recommend(dec!(500), dec!(700), &horizon, 24);
        assert_eq!(rec.verdict, Verdict::Buy);
        assert_eq!(rec.reason, "Buying builds $6,000 in equity after 24 months");
    }

    #[test]
    fn test_equity_at_exactly_thirty_percent_is_tie() {
        let horizon = horizon_with(dec!(20000), dec!(15000), dec!(6000));
        let rec = recommend(dec!(500), dec!(700), &horizon, 36);
        assert_eq!(rec.verdict, Verdict::Tie);
    }

    #[test]
    fn test_horizon_capped_by_short_loan() {
        let inputs = ComparisonInputs {
            loan_term: 24,
            ..ComparisonInputs::default()
        };
        let output = compute_comparison(&inputs).unwrap();
        assert_eq!(output.horizon.horizon_months, 24);
        // A fully repaid loan leaves the whole retained value as equity
        assert!(output.horizon.remaining_balance.abs() < dec!(0.000001));
    }

    #[test]
    fn test_verdict_serializes_lowercase() {
        let json = serde_json::to_string(&Verdict::Buy).unwrap();
        assert_eq!(json, "\"buy\"");
    }

    #[test]
    fn test_full_term_horizon_matches_loan_total() {
        let inputs = ComparisonInputs {
            loan_interest_rate: Decimal::ZERO,
            loan_term: 36,
            ..ComparisonInputs::default()
        };
        let output = compute_comparison(&inputs).unwrap();
        let loan = compute_loan(&inputs.loan_inputs()).unwrap();
        assert_eq!(output.horizon.loan_paid, loan.total_cost);
        assert_eq!(output.horizon.loan_paid, dec!(46981.5));
    }

    #[test]
    fn test_overflowing_loan_rate_is_an_error() {
        let inputs = ComparisonInputs {
            loan_interest_rate: dec!(500),
            loan_term: 240,
            ..ComparisonInputs::default()
        };
        assert!(matches!(
            compare_lease_vs_buy(&inputs),
            Err(AutoDealError::Overflow { .. })
        ));
    }
}

//! Amount financed and level monthly payment for a retail auto loan.
//!
//! Sales tax is levied on the price less the trade-in's appraised value (the
//! common state treatment), fees are added to the price, and cash, positive
//! trade equity and rebates are credited before the balance is amortized
//! with the standard level-payment annuity.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::{level_payment, monthly_rate};
use crate::types::{format_currency, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::validation::{require_non_negative, require_term};
use crate::error::AutoDealError;
use crate::AutoDealResult;

const HIGH_INTEREST_RATE: Decimal = dec!(30);
const LONG_TERM_MONTHS: u32 = 84;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A purchase-with-financing deal sheet.
///
/// Missing fields deserialize to the values of [`LoanInputs::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanInputs {
    /// Negotiated price before taxes and fees
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub trade_in_value: Money,
    pub trade_in_payoff: Money,
    pub rebates: Money,
    /// Annual interest rate in percent (6.5 = 6.5%)
    pub interest_rate: Percent,
    /// Loan term in months
    pub term: u32,
    /// Sales tax in percent
    pub tax_rate: Percent,
    pub doc_fee: Money,
    /// Title and registration
    pub title_fee: Money,
}

impl Default for LoanInputs {
    /// The starting worksheet: $43k financed over 60 months at 6.5%.
    fn default() -> Self {
        Self {
            vehicle_price: dec!(43000),
            down_payment: dec!(5000),
            trade_in_value: Decimal::ZERO,
            trade_in_payoff: Decimal::ZERO,
            rebates: Decimal::ZERO,
            interest_rate: dec!(6.5),
            term: 60,
            tax_rate: dec!(7.75),
            doc_fee: dec!(499),
            title_fee: dec!(150),
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// The loan inputs together with every derived figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanCalculation {
    #[serde(flatten)]
    pub inputs: LoanInputs,
    /// Price less trade-in value, floored at zero
    pub taxable_amount: Money,
    pub sales_tax: Money,
    /// Doc fee plus title fee
    pub total_fees: Money,
    /// Price plus tax plus fees
    pub total_price: Money,
    /// Cash down, positive trade equity and rebates
    pub total_credits: Money,
    /// Principal, including any rolled-in negative equity. May be negative.
    pub amount_financed: Money,
    /// Monthly interest rate applied to the balance
    pub monthly_rate: Rate,
    pub monthly_payment: Money,
    /// Sum of all scheduled payments
    pub total_paid: Money,
    pub total_interest: Money,
    /// Total paid plus cash down
    pub total_cost: Money,
}

impl LoanCalculation {
    /// Trade-in value less payoff. Negative when the trade is underwater.
    pub fn net_trade_in(&self) -> Money {
        self.inputs.trade_in_value - self.inputs.trade_in_payoff
    }

    /// Cash due at signing: down payment, first payment, fees and sales tax.
    pub fn drive_off(&self) -> Money {
        self.inputs.down_payment + self.monthly_payment + self.total_fees + self.sales_tax
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute a loan worksheet.
///
/// A negative amount financed (credits exceeding the total price) is not
/// clamped; it produces a negative monthly payment. Fails on a term outside
/// 1..=[`MAX_TERM_MONTHS`](crate::MAX_TERM_MONTHS) or a rate whose
/// compounding overflows.
pub fn compute_loan(inputs: &LoanInputs) -> AutoDealResult<LoanCalculation> {
    require_term("term", inputs.term)?;

    let net_trade_in = inputs.trade_in_value - inputs.trade_in_payoff;

    // Trade-in value, not equity, comes off the taxable base
    let taxable_amount = (inputs.vehicle_price - inputs.trade_in_value).max(Decimal::ZERO);
    let sales_tax = taxable_amount * inputs.tax_rate / Decimal::ONE_HUNDRED;
    let total_fees = inputs.doc_fee + inputs.title_fee;

    let total_price = inputs.vehicle_price + sales_tax + total_fees;
    let total_credits = inputs.down_payment + net_trade_in.max(Decimal::ZERO) + inputs.rebates;

    let mut amount_financed = total_price - total_credits;
    if net_trade_in < Decimal::ZERO {
        amount_financed += net_trade_in.abs();
    }

    let rate = monthly_rate(inputs.interest_rate);
    let monthly_payment = level_payment(amount_financed, rate, inputs.term)?;

    // (P/n)·n leaves a repeating-decimal residue; at 0% nothing but principal is paid
    let total_paid = if rate.is_zero() {
        amount_financed
    } else {
        monthly_payment
            .checked_mul(Decimal::from(inputs.term))
            .ok_or_else(|| AutoDealError::Overflow {
                context: "total of loan payments".into(),
            })?
    };
    let total_interest = total_paid - amount_financed;
    let total_cost = total_paid + inputs.down_payment;

    Ok(LoanCalculation {
        inputs: inputs.clone(),
        taxable_amount,
        sales_tax,
        total_fees,
        total_price,
        total_credits,
        amount_financed,
        monthly_rate: rate,
        monthly_payment,
        total_paid,
        total_interest,
        total_cost,
    })
}

/// Validate the deal sheet, compute the loan and attach advisory warnings.
pub fn calculate_loan(inputs: &LoanInputs) -> AutoDealResult<ComputationOutput<LoanCalculation>> {
    let start = Instant::now();

    validate_input(inputs)?;
    let calculation = compute_loan(inputs)?;
    let warnings = loan_warnings(&calculation);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Retail installment loan: tax on price less trade value, level-payment annuity",
        inputs,
        warnings,
        elapsed,
        calculation,
    ))
}

fn validate_input(inputs: &LoanInputs) -> AutoDealResult<()> {
    require_term("term", inputs.term)?;
    require_non_negative(&[
        ("vehicle_price", inputs.vehicle_price),
        ("down_payment", inputs.down_payment),
        ("trade_in_value", inputs.trade_in_value),
        ("trade_in_payoff", inputs.trade_in_payoff),
        ("rebates", inputs.rebates),
        ("interest_rate", inputs.interest_rate),
        ("tax_rate", inputs.tax_rate),
        ("doc_fee", inputs.doc_fee),
        ("title_fee", inputs.title_fee),
    ])
}

fn loan_warnings(calc: &LoanCalculation) -> Vec<String> {
    let inputs = &calc.inputs;
    let mut warnings = Vec::new();

    let net_trade_in = calc.net_trade_in();
    if net_trade_in < Decimal::ZERO {
        warnings.push(format!(
            "Negative equity of {} will be added to the loan",
            format_currency(net_trade_in.abs())
        ));
    }

    if calc.amount_financed < Decimal::ZERO {
        warnings.push(format!(
            "Credits exceed the total price by {}; amount financed and payment are negative (overpayment)",
            format_currency(calc.amount_financed.abs())
        ));
    }

    if inputs.interest_rate > HIGH_INTEREST_RATE {
        warnings.push(format!(
            "Interest rate of {}% exceeds {}%; verify the quote",
            inputs.interest_rate, HIGH_INTEREST_RATE
        ));
    }

    if inputs.term > LONG_TERM_MONTHS {
        warnings.push(format!(
            "Loan term of {} months is longer than {} months",
            inputs.term, LONG_TERM_MONTHS
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scenario_b_breakdown() {
        let calc = compute_loan(&LoanInputs::default()).unwrap();

        assert_eq!(calc.taxable_amount, dec!(43000));
        assert_eq!(calc.sales_tax, dec!(3332.50));
        assert_eq!(calc.total_fees, dec!(649));
        assert_eq!(calc.total_price, dec!(46981.50));
        assert_eq!(calc.amount_financed, dec!(41981.50));
        assert!((calc.monthly_rate - dec!(0.0054167)).abs() < dec!(0.0000001));
        assert!((calc.monthly_payment - dec!(821.42)).abs() < dec!(0.01));
    }

    #[test]
    fn test_total_interest_identity() {
        let calc = compute_loan(&LoanInputs::default()).unwrap();
        assert_eq!(
            calc.monthly_payment * dec!(60) - calc.amount_financed,
            calc.total_interest
        );
        assert_eq!(calc.total_cost, calc.total_paid + dec!(5000));
        assert!((calc.total_interest - dec!(7303.48)).abs() < dec!(0.01));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let input = LoanInputs {
            interest_rate: Decimal::ZERO,
            ..LoanInputs::default()
        };
        let calc = compute_loan(&input).unwrap();
        assert_eq!(calc.monthly_payment, calc.amount_financed / dec!(60));
        assert_eq!(calc.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_trade_value_reduces_taxable_base() {
        let input = LoanInputs {
            trade_in_value: dec!(10000),
            trade_in_payoff: dec!(12000),
            ..LoanInputs::default()
        };
        let calc = compute_loan(&input).unwrap();
        // Full trade value comes off the tax base even though equity is negative
        assert_eq!(calc.taxable_amount, dec!(33000));
        assert_eq!(calc.total_credits, dec!(5000));
    }

    #[test]
    fn test_taxable_amount_floored() {
        let input = LoanInputs {
            trade_in_value: dec!(50000),
            ..LoanInputs::default()
        };
        let calc = compute_loan(&input).unwrap();
        assert_eq!(calc.taxable_amount, Decimal::ZERO);
        assert_eq!(calc.sales_tax, Decimal::ZERO);
    }

    #[test]
    fn test_overpayment_passes_through() {
        let input = LoanInputs {
            vehicle_price: dec!(10000),
            down_payment: dec!(20000),
            ..LoanInputs::default()
        };
        let calc = compute_loan(&input).unwrap();
        assert!(calc.amount_financed < Decimal::ZERO);
        assert!(calc.monthly_payment < Decimal::ZERO);

        let output = calculate_loan(&input).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("overpayment")));
    }

    #[test]
    fn test_drive_off() {
        let calc = compute_loan(&LoanInputs::default()).unwrap();
        assert_eq!(
            calc.drive_off(),
            dec!(5000) + calc.monthly_payment + dec!(649) + dec!(3332.50)
        );
    }

    #[test]
    fn test_runaway_rate_is_an_error_not_a_panic() {
        let input = LoanInputs {
            interest_rate: dec!(1000),
            term: 120,
            ..LoanInputs::default()
        };
        assert!(matches!(
            calculate_loan(&input),
            Err(AutoDealError::Overflow { .. })
        ));
    }

    #[test]
    fn test_zero_term_rejected() {
        let input = LoanInputs {
            term: 0,
            ..LoanInputs::default()
        };
        assert!(calculate_loan(&input).is_err());
    }
}

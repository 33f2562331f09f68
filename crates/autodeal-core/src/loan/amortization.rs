use serde::{Deserialize, Serialize};

use crate::time_value::split_payment;
use crate::types::Money;
use crate::MAX_TERM_MONTHS;

use super::calculator::LoanCalculation;

/// A single month of a loan amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Month number (1-indexed)
    pub month: u32,
    pub beginning_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub ending_balance: Money,
}

/// Month-by-month schedule for a computed loan.
///
/// Interest accrues on the outstanding balance at the loan's monthly rate and
/// the remainder of the level payment retires principal. The final ending
/// balance is zero up to decimal rounding.
pub fn amortization_schedule(loan: &LoanCalculation) -> Vec<AmortizationRow> {
    let mut rows = Vec::with_capacity(loan.inputs.term.min(MAX_TERM_MONTHS) as usize);
    let mut balance = loan.amount_financed;

    for month in 1..=loan.inputs.term {
        let (interest, principal) = split_payment(balance, loan.monthly_payment, loan.monthly_rate);
        let ending_balance = balance - principal;
        rows.push(AmortizationRow {
            month,
            beginning_balance: balance,
            payment: loan.monthly_payment,
            interest,
            principal,
            ending_balance,
        });
        balance = ending_balance;
    }

    rows
}

//! Retail installment (auto loan) calculation and amortization.

pub mod amortization;
pub mod calculator;

pub use amortization::{amortization_schedule, AmortizationRow};
pub use calculator::{calculate_loan, compute_loan, LoanCalculation, LoanInputs};

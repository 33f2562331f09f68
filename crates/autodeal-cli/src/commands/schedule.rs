use clap::Args;
use serde_json::Value;

use autodeal_core::loan::{self, AmortizationRow};

use super::loan::LoanArgs;

/// Arguments for a loan amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// One row per month, rounded to cents for display.
pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = args.loan.resolve()?;
    let output = loan::calculate_loan(&inputs)?;

    for warning in &output.warnings {
        tracing::warn!("{warning}");
    }

    let rows: Vec<AmortizationRow> = loan::amortization_schedule(&output.result)
        .into_iter()
        .map(|row| AmortizationRow {
            beginning_balance: row.beginning_balance.round_dp(2),
            payment: row.payment.round_dp(2),
            interest: row.interest.round_dp(2),
            principal: row.principal.round_dp(2),
            ending_balance: row.ending_balance.round_dp(2),
            ..row
        })
        .collect();

    Ok(serde_json::to_value(rows)?)
}

use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use autodeal_core::loan::{self, LoanInputs};

use super::override_with;
use crate::input;

/// Arguments for an auto loan calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (individual flags override its values)
    #[arg(long)]
    pub input: Option<String>,

    /// Negotiated vehicle price
    #[arg(long, alias = "price")]
    pub vehicle_price: Option<Decimal>,

    /// Cash down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Appraised trade-in value
    #[arg(long)]
    pub trade_in_value: Option<Decimal>,

    /// Amount still owed on the trade-in
    #[arg(long)]
    pub trade_in_payoff: Option<Decimal>,

    /// Manufacturer rebates
    #[arg(long)]
    pub rebates: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "apr")]
    pub interest_rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Sales tax rate in percent
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Dealer documentation fee
    #[arg(long)]
    pub doc_fee: Option<Decimal>,

    /// Title and registration fees
    #[arg(long)]
    pub title_fee: Option<Decimal>,
}

impl LoanArgs {
    /// Input file or stdin record with flag overrides applied.
    pub fn resolve(self) -> Result<LoanInputs, Box<dyn std::error::Error>> {
        let mut inputs: LoanInputs = input::load_or_default(self.input.as_deref())?;

        override_with(&mut inputs.vehicle_price, self.vehicle_price);
        override_with(&mut inputs.down_payment, self.down_payment);
        override_with(&mut inputs.trade_in_value, self.trade_in_value);
        override_with(&mut inputs.trade_in_payoff, self.trade_in_payoff);
        override_with(&mut inputs.rebates, self.rebates);
        override_with(&mut inputs.interest_rate, self.interest_rate);
        override_with(&mut inputs.term, self.term);
        override_with(&mut inputs.tax_rate, self.tax_rate);
        override_with(&mut inputs.doc_fee, self.doc_fee);
        override_with(&mut inputs.title_fee, self.title_fee);

        Ok(inputs)
    }
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = args.resolve()?;
    let result = loan::calculate_loan(&inputs)?;
    Ok(serde_json::to_value(result)?)
}

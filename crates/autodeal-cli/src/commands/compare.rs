use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use autodeal_core::comparison::{self, ComparisonInputs};

use super::override_with;
use super::rates::VehicleArgs;
use crate::input;

/// Arguments for a lease vs. buy comparison
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CompareArgs {
    /// Path to JSON or YAML input file (individual flags override its values)
    #[arg(long)]
    pub input: Option<String>,

    /// Manufacturer's suggested retail price
    #[arg(long)]
    pub msrp: Option<Decimal>,

    /// Negotiated selling price (also the loan's vehicle price)
    #[arg(long)]
    pub selling_price: Option<Decimal>,

    /// Cash down payment applied to both deals
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

    /// Sales tax rate in percent
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Dealer documentation fee
    #[arg(long)]
    pub doc_fee: Option<Decimal>,

    /// Lease money factor
    #[arg(long, alias = "mf")]
    pub lease_money_factor: Option<Decimal>,

    /// Lease residual as a percent of MSRP
    #[arg(long)]
    pub lease_residual_percent: Option<Decimal>,

    /// Lease term in months
    #[arg(long)]
    pub lease_term: Option<u32>,

    /// Bank acquisition fee
    #[arg(long)]
    pub acquisition_fee: Option<Decimal>,

    /// Annual loan interest rate in percent
    #[arg(long)]
    pub loan_interest_rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub loan_term: Option<u32>,

    /// Title and registration fees
    #[arg(long)]
    pub title_fee: Option<Decimal>,

    #[command(flatten)]
    pub vehicle: VehicleArgs,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut inputs: ComparisonInputs = input::load_or_default(args.input.as_deref())?;

    if let Some(selection) = args.vehicle.selection()? {
        inputs = selection.apply_to_comparison(&inputs);
    }

    override_with(&mut inputs.msrp, args.msrp);
    override_with(&mut inputs.selling_price, args.selling_price);
    override_with(&mut inputs.down_payment, args.down_payment);
    override_with(&mut inputs.trade_in_value, args.trade_in_value);
    override_with(&mut inputs.trade_in_payoff, args.trade_in_payoff);
    override_with(&mut inputs.rebates, args.rebates);
    override_with(&mut inputs.tax_rate, args.tax_rate);
    override_with(&mut inputs.doc_fee, args.doc_fee);
    override_with(&mut inputs.lease_money_factor, args.lease_money_factor);
    override_with(&mut inputs.lease_residual_percent, args.lease_residual_percent);
    override_with(&mut inputs.lease_term, args.lease_term);
    override_with(&mut inputs.acquisition_fee, args.acquisition_fee);
    override_with(&mut inputs.loan_interest_rate, args.loan_interest_rate);
    override_with(&mut inputs.loan_term, args.loan_term);
    override_with(&mut inputs.title_fee, args.title_fee);

    let result = comparison::compare_lease_vs_buy(&inputs)?;
    Ok(serde_json::to_value(result)?)
}

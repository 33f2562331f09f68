use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use autodeal_core::lease::{self, LeaseInputs};

use super::override_with;
use super::rates::VehicleArgs;
use crate::input;

/// Arguments for a lease payment calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LeaseArgs {
    /// Path to JSON or YAML input file (individual flags override its values)
    #[arg(long)]
    pub input: Option<String>,

    /// Manufacturer's suggested retail price
    #[arg(long)]
    pub msrp: Option<Decimal>,

    /// Negotiated selling price
    #[arg(long)]
    pub selling_price: Option<Decimal>,

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

    /// Residual value as a percent of MSRP
    #[arg(long, alias = "residual")]
    pub residual_percent: Option<Decimal>,

    /// Lease money factor (e.g. 0.00125)
    #[arg(long, alias = "mf")]
    pub money_factor: Option<Decimal>,

    /// Lease term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Bank acquisition fee
    #[arg(long)]
    pub acquisition_fee: Option<Decimal>,

    /// Dealer documentation fee
    #[arg(long)]
    pub doc_fee: Option<Decimal>,

    /// Sales tax rate in percent
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    #[command(flatten)]
    pub vehicle: VehicleArgs,
}

pub fn run_lease(args: LeaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut inputs: LeaseInputs = input::load_or_default(args.input.as_deref())?;

    if let Some(selection) = args.vehicle.selection()? {
        inputs = selection.apply_to_lease(&inputs);
    }

    override_with(&mut inputs.msrp, args.msrp);
    override_with(&mut inputs.selling_price, args.selling_price);
    override_with(&mut inputs.down_payment, args.down_payment);
    override_with(&mut inputs.trade_in_value, args.trade_in_value);
    override_with(&mut inputs.trade_in_payoff, args.trade_in_payoff);
    override_with(&mut inputs.rebates, args.rebates);
    override_with(&mut inputs.residual_percent, args.residual_percent);
    override_with(&mut inputs.money_factor, args.money_factor);
    override_with(&mut inputs.term, args.term);
    override_with(&mut inputs.acquisition_fee, args.acquisition_fee);
    override_with(&mut inputs.doc_fee, args.doc_fee);
    override_with(&mut inputs.tax_rate, args.tax_rate);

    let result = lease::calculate_lease(&inputs)?;
    Ok(serde_json::to_value(result)?)
}

use clap::{Args, Subcommand};
use serde_json::{json, Value};

use autodeal_core::rates::{self, RateSelection, RateSubmission, DEFAULT_MILEAGE};

use crate::input;

/// Pick money factor, residual and MSRP from the reference table
#[derive(Args)]
pub struct VehicleArgs {
    /// Vehicle make to look up in the rate table (requires --model)
    #[arg(long, requires = "model")]
    pub make: Option<String>,

    /// Vehicle model to look up in the rate table (requires --make)
    #[arg(long, requires = "make")]
    pub model: Option<String>,

    /// Annual mileage band for the rate lookup
    #[arg(long, default_value_t = DEFAULT_MILEAGE)]
    pub mileage: u32,
}

impl VehicleArgs {
    pub fn selection(&self) -> Result<Option<RateSelection>, Box<dyn std::error::Error>> {
        match (&self.make, &self.model) {
            (Some(make), Some(model)) => {
                let selection = rates::select_vehicle(make, model, self.mileage)?;
                tracing::debug!(
                    vehicle = %selection.vehicle_id,
                    money_factor = %selection.money_factor,
                    residual_percent = %selection.residual_percent,
                    "applying rate table selection"
                );
                Ok(Some(selection))
            }
            _ => Ok(None),
        }
    }
}

/// Arguments for the rate reference table
#[derive(Args)]
pub struct RatesArgs {
    #[command(subcommand)]
    pub command: RatesCommand,
}

#[derive(Subcommand)]
pub enum RatesCommand {
    /// List every make in the table
    Makes,
    /// List the models published for a make
    Models {
        /// Vehicle make, e.g. Toyota
        make: String,
    },
    /// Show every program for a make and model
    Show {
        make: String,
        model: String,
    },
    /// Case-insensitive search over make and model
    Search {
        query: String,
        /// Mileage band used for the summary columns
        #[arg(long, default_value_t = DEFAULT_MILEAGE)]
        mileage: u32,
    },
}

/// Arguments for reporting a lease rate
#[derive(Args)]
pub struct SubmitRateArgs {
    /// Path to JSON or YAML submission file (or pipe JSON on stdin)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_rates(args: RatesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    match args.command {
        RatesCommand::Makes => Ok(json!(rates::makes()?)),
        RatesCommand::Models { make } => Ok(json!(rates::models_by_make(&make)?)),
        RatesCommand::Show { make, model } => {
            let rate = rates::vehicle_rate(&make, &model)?;
            Ok(serde_json::to_value(rate)?)
        }
        RatesCommand::Search { query, mileage } => {
            let rows: Vec<Value> = rates::search(&query)?
                .into_iter()
                .filter_map(|rate| rate.selection(mileage).map(|sel| (rate, sel)))
                .map(|(rate, sel)| {
                    json!({
                        "make": rate.make,
                        "model": rate.model,
                        "year": rate.year,
                        "trim": rate.trim,
                        "msrp": sel.msrp,
                        "term": sel.term_months,
                        "mileage": sel.mileage,
                        "money_factor": sel.money_factor,
                        "residual_percent": sel.residual_percent,
                        "verified": rate.verified,
                    })
                })
                .collect();
            Ok(Value::Array(rows))
        }
    }
}

pub fn run_submit_rate(args: SubmitRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let submission: RateSubmission =
        input::load_required(args.input.as_deref(), "submit-rate")?;
    let receipt = rates::submit_rate(&submission)?;
    Ok(serde_json::to_value(receipt)?)
}

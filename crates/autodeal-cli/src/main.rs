mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::chat::ChatArgs;
use commands::compare::CompareArgs;
use commands::lease::LeaseArgs;
use commands::loan::LoanArgs;
use commands::rates::{RatesArgs, SubmitRateArgs};
use commands::schedule::ScheduleArgs;

/// Car lease, loan and lease-vs-buy calculations
#[derive(Parser)]
#[command(
    name = "autodeal",
    version,
    about = "Car lease, loan and lease-vs-buy calculations",
    long_about = "A CLI for pricing car deals with decimal precision. Computes lease \
                  payments from money factor and residual, amortizes auto loans, \
                  compares leasing against buying, looks up published lease rates, \
                  and forwards questions to a negotiation assistant."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a monthly lease payment
    Lease(LeaseArgs),
    /// Calculate an auto loan payment
    Loan(LoanArgs),
    /// Compare leasing against financing the same vehicle
    Compare(CompareArgs),
    /// Month-by-month loan amortization schedule
    Schedule(ScheduleArgs),
    /// Browse the lease rate reference table
    Rates(RatesArgs),
    /// Report a lease rate from a dealer quote or signed contract
    SubmitRate(SubmitRateArgs),
    /// Ask the negotiation assistant a question
    Chat(ChatArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

/// Log to stderr so stdout carries only the result. `RUST_LOG` overrides.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Lease(args) => commands::lease::run_lease(args),
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Rates(args) => commands::rates::run_rates(args),
        Commands::SubmitRate(args) => commands::rates::run_submit_rate(args),
        Commands::Chat(args) => commands::chat::run_chat(args),
        Commands::Version => {
            println!("autodeal {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

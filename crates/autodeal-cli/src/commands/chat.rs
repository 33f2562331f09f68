use clap::{Args, ValueEnum};
use serde_json::Value;

use autodeal_core::assistant::{context, Assistant, ChatMessage, ChatRequest, GREETING};
use autodeal_core::comparison::{self, ComparisonInputs};
use autodeal_core::lease::{self, LeaseInputs};
use autodeal_core::loan::{self, LoanInputs};

use crate::input;

/// Which calculator to snapshot into the conversation
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Snapshot {
    Lease,
    Loan,
    Compare,
}

/// Arguments for asking the negotiation assistant
#[derive(Args)]
pub struct ChatArgs {
    /// Question for the assistant
    #[arg(long, short)]
    pub message: String,

    /// Plain-text file appended to the system prompt (e.g. a dealer quote)
    #[arg(long)]
    pub context: Option<String>,

    /// Include a calculator snapshot as context
    #[arg(long, value_enum)]
    pub snapshot: Option<Snapshot>,

    /// JSON or YAML deal file for the snapshot (defaults when omitted)
    #[arg(long, requires = "snapshot")]
    pub deal: Option<String>,
}

pub fn run_chat(args: ChatArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut sections = Vec::new();
    if let Some(path) = &args.context {
        sections.push(input::file::read_text(path)?.trim().to_string());
    }
    if let Some(kind) = args.snapshot {
        sections.push(snapshot(kind, args.deal.as_deref())?);
    }

    let request = ChatRequest {
        messages: vec![ChatMessage::assistant(GREETING), ChatMessage::user(args.message)],
        context: (!sections.is_empty()).then(|| sections.join("\n\n")),
    };

    let assistant = Assistant::from_env()?;
    if !assistant.is_connected() {
        tracing::info!("no assistant credentials found; replying offline");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let reply = runtime.block_on(assistant.reply(&request));

    Ok(serde_json::to_value(reply)?)
}

fn snapshot(kind: Snapshot, deal: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    let text = match kind {
        Snapshot::Lease => {
            let inputs: LeaseInputs = load_deal(deal)?;
            context::lease_snapshot(&lease::calculate_lease(&inputs)?.result)
        }
        Snapshot::Loan => {
            let inputs: LoanInputs = load_deal(deal)?;
            context::loan_snapshot(&loan::calculate_loan(&inputs)?.result)
        }
        Snapshot::Compare => {
            let inputs: ComparisonInputs = load_deal(deal)?;
            context::comparison_snapshot(&comparison::compare_lease_vs_buy(&inputs)?.result)
        }
    };
    Ok(text)
}

fn load_deal<T>(path: Option<&str>) -> Result<T, Box<dyn std::error::Error>>
where
    T: serde::de::DeserializeOwned + Default,
{
    match path {
        Some(path) => input::file::read_input(path),
        None => Ok(T::default()),
    }
}

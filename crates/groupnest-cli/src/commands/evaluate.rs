use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use groupnest_core::evaluation::{self, EvaluationInput, RecomputeTrigger};

use crate::input;

/// Arguments for a full group evaluation
#[derive(Args)]
pub struct EvaluateArgs {
    /// Path to a JSON or YAML group snapshot (or pipe JSON via stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Override the group identifier recorded with the evaluation
    #[arg(long)]
    pub group_id: Option<String>,

    /// What prompted this evaluation
    #[arg(long)]
    pub trigger: Option<TriggerArg>,

    /// Override the annual rate used for loan sizing
    #[arg(long)]
    pub annual_rate: Option<Decimal>,
}

/// CLI-facing mirror of the core trigger enum
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TriggerArg {
    MemberStatusChanged,
    CreditCheckCompleted,
    CostUpdated,
    Manual,
}

impl From<TriggerArg> for RecomputeTrigger {
    fn from(arg: TriggerArg) -> Self {
        match arg {
            TriggerArg::MemberStatusChanged => RecomputeTrigger::MemberStatusChanged,
            TriggerArg::CreditCheckCompleted => RecomputeTrigger::CreditCheckCompleted,
            TriggerArg::CostUpdated => RecomputeTrigger::CostUpdated,
            TriggerArg::Manual => RecomputeTrigger::Manual,
        }
    }
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut evaluation_input: EvaluationInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(parsed) = input::stdin::read_stdin()? {
        parsed
    } else {
        return Err("--input file or piped stdin is required for a group evaluation".into());
    };

    if let Some(group_id) = args.group_id {
        evaluation_input.group_id = Some(group_id);
    }
    if let Some(trigger) = args.trigger {
        evaluation_input.trigger = Some(trigger.into());
    }
    if let Some(rate) = args.annual_rate {
        evaluation_input.annual_rate = Some(rate);
    }

    let result = evaluation::evaluate_group(&evaluation_input)?;
    Ok(serde_json::to_value(result)?)
}

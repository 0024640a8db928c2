use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use groupnest_core::metrics::group::{self, GroupMetricsInput};

use crate::input;

/// Arguments for group affordability metrics
#[derive(Args)]
pub struct MetricsArgs {
    /// Path to a JSON or YAML group snapshot (or pipe JSON via stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Override the annual rate used for loan sizing
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Override the estimated monthly housing cost
    #[arg(long)]
    pub cost: Option<Decimal>,
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut metrics_input: GroupMetricsInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(parsed) = input::stdin::read_stdin()? {
        parsed
    } else {
        return Err("--input file or piped stdin is required for group metrics".into());
    };

    if let Some(rate) = args.annual_rate {
        metrics_input.annual_rate = Some(rate);
    }
    if let Some(cost) = args.cost {
        metrics_input.estimated_monthly_cost = cost;
    }

    let result = group::calculate_group_metrics(&metrics_input)?;
    Ok(serde_json::to_value(result)?)
}

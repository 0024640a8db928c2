use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use groupnest_core::contributions::engine::{self, ContributionInput};

use crate::input;

/// Arguments for contribution split modelling
#[derive(Args)]
pub struct ContributionsArgs {
    /// Path to a JSON or YAML group snapshot (or pipe JSON via stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Member id to exclude for what-if simulation (repeatable)
    #[arg(long = "exclude")]
    pub exclude: Vec<String>,

    /// Override the blend weight on the equal component of the hybrid model
    #[arg(long)]
    pub hybrid_equal_ratio: Option<Decimal>,

    /// Override the estimated monthly housing cost
    #[arg(long)]
    pub cost: Option<Decimal>,
}

pub fn run_contributions(args: ContributionsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut contribution_input: ContributionInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(parsed) = input::stdin::read_stdin()? {
        parsed
    } else {
        return Err("--input file or piped stdin is required for contribution modelling".into());
    };

    // flags stack on top of whatever the snapshot already excludes
    contribution_input.exclude_ids.extend(args.exclude);
    if let Some(ratio) = args.hybrid_equal_ratio {
        contribution_input.hybrid_equal_ratio = Some(ratio);
    }
    if let Some(cost) = args.cost {
        contribution_input.estimated_monthly_cost = cost;
    }

    let result = engine::calculate_contribution_models(&contribution_input)?;
    Ok(serde_json::to_value(result)?)
}

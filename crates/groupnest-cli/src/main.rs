mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::contributions::ContributionsArgs;
use commands::evaluate::EvaluateArgs;
use commands::metrics::MetricsArgs;

/// Group housing affordability analytics
#[derive(Parser)]
#[command(
    name = "gnest",
    version,
    about = "Group housing affordability analytics",
    long_about = "A CLI for evaluating the shared finances of housing groups with \
                  decimal precision. Computes combined affordability metrics, the \
                  per-member resilience matrix, and contribution split models \
                  (equal, proportional, unit-weighted, hybrid and custom)."
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
    /// Combined affordability metrics and the resilience matrix
    Metrics(MetricsArgs),
    /// Contribution split models over the eligible roster
    Contributions(ContributionsArgs),
    /// Full evaluation: metrics plus every contribution model
    Evaluate(EvaluateArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Metrics(args) => commands::metrics::run_metrics(args),
        Commands::Contributions(args) => commands::contributions::run_contributions(args),
        Commands::Evaluate(args) => commands::evaluate::run_evaluate(args),
        Commands::Version => {
            println!("gnest {}", env!("CARGO_PKG_VERSION"));
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

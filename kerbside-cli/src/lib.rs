//! Command-line interface for the kerbside postman engine.
#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kerbside_core::VertexId;

pub mod error;
pub mod network;
pub mod patrol;
pub mod solve;

pub use error::CliError;

/// Run the kerbside CLI with the current process arguments.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Solve(args) => {
            let report = solve::run_solve(&args.network)?;
            emit(&report)
        }
        Command::Patrol(args) => {
            let report = patrol::run_patrol(&args.network, args.seed_vertex, args.max_rounds)?;
            emit(&report)
        }
    }
}

fn emit<T: serde::Serialize>(report: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(report)?;
    println!("{rendered}");
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "kerbside",
    about = "Chinese Postman tours and patrol-coverage simulation over street networks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute a full postman tour over the whole network.
    Solve(SolveArgs),
    /// Simulate progressive patrol coverage patch by patch.
    Patrol(PatrolArgs),
}

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser)]
#[command(about = "Solve the Chinese Postman Problem for a network file")]
struct SolveArgs {
    /// Path to the JSON network description.
    #[arg(value_name = "network")]
    network: PathBuf,
}

/// CLI arguments for the `patrol` subcommand.
#[derive(Debug, Clone, Parser)]
#[command(
    long_about = "Grow solvable patches outward from a seed vertex, solve \
                 each as an independent postman problem, and track global \
                 coverage until every edge has been patrolled.",
    about = "Simulate progressive patrol coverage"
)]
struct PatrolArgs {
    /// Path to the JSON network description.
    #[arg(value_name = "network")]
    network: PathBuf,
    /// Vertex the first expansion grows from.
    #[arg(long, default_value_t = 1)]
    seed_vertex: VertexId,
    /// Stop after this many rounds, even if edges remain.
    #[arg(long)]
    max_rounds: Option<usize>,
}

//! Spider diagram prover CLI
//!
//! Reads a proof problem, searches for a proof and prints it.
//! Exit status: 0 when a proof was found, 1 when none was, 2 on bad input.

use clap::Parser;
use spider_reasoner_core::registry::{build_prover, prover_kind_or_default};
use spider_reasoner_core::{LoadError, ProofError, ProofProblem, SearchResult};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sd-prove")]
#[command(about = "Search for proofs of spider diagram goals")]
struct Args {
    /// Input problem file (JSON)
    problem: PathBuf,

    /// Prover to use (breadth_first, best_first)
    #[arg(long)]
    prover: Option<String>,

    /// Strategy ranking the search (none, connective_count, implication)
    #[arg(long)]
    strategy: Option<String>,

    /// Maximum number of proof steps
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print the search result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Proof(#[from] ProofError),
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<bool, CliError> {
    let json = std::fs::read_to_string(&args.problem).map_err(|source| CliError::Io {
        path: args.problem.clone(),
        source,
    })?;
    let problem = ProofProblem::from_json(&json)?;
    let goals = problem.to_goal_state()?;
    let rules = problem.resolve_rules()?;

    let mut config = problem.prover_config();
    if let Some(name) = &args.prover {
        config.kind = prover_kind_or_default(name);
    }
    if let Some(name) = &args.strategy {
        config.strategy = name.clone();
    }
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    debug!(?config, rules = rules.len(), "prover configured");

    info!(problem = %problem.id, subgoals = goals.len(), "searching");
    let prover = build_prover(config, rules);
    let mut result = prover.generate_proof(goals);
    if let Some(proof) = result.proof.as_mut() {
        proof.add_metadata("problem", problem.id.clone());
    }

    if args.json {
        println!("{}", to_json(&result)?);
    } else {
        print_result(&problem, &result);
    }
    Ok(result.is_proved())
}

fn to_json(result: &SearchResult) -> Result<String, ProofError> {
    Ok(serde_json::to_string_pretty(result)?)
}

fn print_result(problem: &ProofProblem, result: &SearchResult) {
    match &result.proof {
        Some(proof) => {
            println!(
                "{}: proved in {} step(s) ({} states explored)",
                problem.id,
                proof.application_count(),
                result.states_explored
            );
            print!("{}", proof);
        }
        None => {
            let reason = if result.bound_reached {
                "search bound reached"
            } else {
                "search space exhausted"
            };
            println!(
                "{}: no proof found, {:?} ({} states explored, {})",
                problem.id, result.status, result.states_explored, reason
            );
        }
    }
}

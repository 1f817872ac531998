//! # ert CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ert_cli::execute::{run_execute, RunArgs};
use ert_cli::prove::{run_prove, ProveArgs};
use ert_cli::verify::{run_verify, VerifyArgs};

/// ERT attestation stack CLI.
///
/// Generates and verifies compliance proofs that bind swap, yield,
/// perpetual, and settlement actions to an execution right, and runs them
/// through the simulated execution gateway.
#[derive(Parser, Debug)]
#[command(name = "ert", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit machine-readable JSON instead of text reports.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a proof for an action against an execution right.
    Prove(ProveArgs),

    /// Verify a proof document.
    Verify(VerifyArgs),

    /// Generate, verify, and execute an action.
    Run(RunArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let result = match cli.command {
        Commands::Prove(args) => run_prove(&args),
        Commands::Verify(args) => run_verify(&args, cli.json),
        Commands::Run(args) => run_execute(&args, cli.json).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

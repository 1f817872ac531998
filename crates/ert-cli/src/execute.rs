//! # Run Subcommand
//!
//! Drives one action through the orchestrator: generate, verify, and
//! submit to the simulated gateway. Configuration comes from the
//! environment (see [`ExecutorConfig::from_env`]).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ert_core::ExecutionRight;
use ert_executor::{ExecutionOrchestrator, ExecutionResult, ExecutorConfig};
use ert_state::HistoryEntry;
use ert_zkp::{PerpetualParams, SettlementParams, SwapParams, YieldParams};
use serde::Serialize;

use crate::{load_document, ActionArg, EXIT_REJECTED};

/// Arguments for `ert run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Action to execute.
    #[arg(value_enum)]
    pub action: ActionArg,
    /// Execution right document (JSON or YAML).
    #[arg(long)]
    pub right: PathBuf,
    /// Action parameters document (JSON or YAML).
    #[arg(long)]
    pub params: PathBuf,
}

#[derive(Serialize)]
struct RunReport<'a> {
    result: &'a ExecutionResult,
    history: &'a [HistoryEntry],
}

/// Execute the run subcommand with configuration from the environment.
pub async fn run_execute(args: &RunArgs, json: bool) -> Result<u8> {
    let config = ExecutorConfig::from_env().context("invalid executor configuration")?;
    run_with_config(args, &config, json).await
}

/// Execute the run subcommand against an explicit configuration.
pub async fn run_with_config(args: &RunArgs, config: &ExecutorConfig, json: bool) -> Result<u8> {
    let right: ExecutionRight = load_document(&args.right)?;
    let orchestrator = ExecutionOrchestrator::from_config(config);
    let result = dispatch(&orchestrator, args, &right).await?;
    let history = orchestrator.execution_history(config.history_capacity);

    if json {
        let report = RunReport {
            result: &result,
            history: &history,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_result(args.action, &result);
    }
    Ok(if result.success { 0 } else { EXIT_REJECTED })
}

async fn dispatch(
    orchestrator: &ExecutionOrchestrator,
    args: &RunArgs,
    right: &ExecutionRight,
) -> Result<ExecutionResult> {
    let result = match args.action {
        ActionArg::Swap => {
            let params: SwapParams = load_document(&args.params)?;
            orchestrator.execute_swap(right, &params).await
        }
        ActionArg::Yield => {
            let params: YieldParams = load_document(&args.params)?;
            orchestrator.execute_yield(right, &params).await
        }
        ActionArg::Perp => {
            let params: PerpetualParams = load_document(&args.params)?;
            orchestrator.execute_perpetual(right, &params).await
        }
        ActionArg::Settle => {
            let params: SettlementParams = load_document(&args.params)?;
            orchestrator.execute_settlement(right, &params).await
        }
    };
    Ok(result)
}

fn print_result(action: ActionArg, result: &ExecutionResult) {
    let action = action.action_type();
    if result.success {
        println!("OK: {action} executed");
        if let Some(tx) = &result.tx_hash {
            println!("  Transaction: {tx}");
        }
    } else {
        println!("FAILED: {action} not executed");
        if let Some(error) = &result.error {
            println!("  Error: {error}");
        }
    }
    if let Some(hash) = &result.proof_hash {
        println!("  Proof hash:  {hash}");
    }
    if let Some(verification) = &result.verification {
        println!(
            "  Verified:    {} ({:.2} ms, {} checks)",
            verification.valid,
            verification.verification_time_ms,
            verification.details.len()
        );
    }
    println!("  History id:  {}", result.history_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{write, RIGHT_JSON, SWAP_JSON};

    fn args(dir: &std::path::Path, action: ActionArg, params: &str) -> RunArgs {
        RunArgs {
            action,
            right: write(dir, "right.json", RIGHT_JSON),
            params: write(dir, "params.json", params),
        }
    }

    #[tokio::test]
    async fn compliant_swap_runs() {
        let dir = tempfile::tempdir().unwrap();
        let code = run_with_config(
            &args(dir.path(), ActionArg::Swap, SWAP_JSON),
            &ExecutorConfig::local_test(),
            true,
        )
        .await
        .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn over_leveraged_perpetual_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let perp = r#"{
            "market": "0x00000000000000000000000000000000000000b1",
            "size": 500,
            "leverage": 20,
            "side": "short"
        }"#;
        let code = run_with_config(
            &args(dir.path(), ActionArg::Perp, perp),
            &ExecutorConfig::local_test(),
            false,
        )
        .await
        .unwrap();
        assert_eq!(code, EXIT_REJECTED);
    }

    #[tokio::test]
    async fn unreadable_params_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_with_config(
            &args(dir.path(), ActionArg::Settle, "not json"),
            &ExecutorConfig::local_test(),
            false,
        )
        .await;
        assert!(result.is_err());
    }
}

//! # Prove Subcommand
//!
//! Generates a proof for one action against an execution right and writes
//! the proof document as JSON. Non-compliant parameters still produce a
//! proof; its attestation bits record which limits were violated.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use ert_core::ExecutionRight;
use ert_zkp::{
    ActionProof, PerpetualParams, ProofEngine, SettlementParams, SwapParams, YieldParams,
};

use crate::{emit, load_document, ActionArg};

/// Arguments for `ert prove`.
#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Action to prove.
    #[arg(value_enum)]
    pub action: ActionArg,
    /// Execution right document (JSON or YAML).
    #[arg(long)]
    pub right: PathBuf,
    /// Action parameters document (JSON or YAML).
    #[arg(long)]
    pub params: PathBuf,
    /// Output file for the proof. Defaults to stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Execute the prove subcommand.
pub fn run_prove(args: &ProveArgs) -> Result<u8> {
    let right: ExecutionRight = load_document(&args.right)?;
    let proof = generate(&ProofEngine::default(), args.action, &right, &args.params)?;
    let body = serde_json::to_string_pretty(&proof).context("failed to serialize proof")?;
    emit(args.out.as_deref(), &body)?;

    tracing::info!(
        ert_id = %proof.ert_id(),
        action = %proof.action(),
        proof_hash = %proof.proof_hash(),
        "proof generated"
    );
    if let Some(out) = &args.out {
        println!("OK: wrote {} proof to {}", proof.action(), out.display());
        for (label, bit) in proof.attestation_records() {
            println!("  {label}: {bit}");
        }
    }
    Ok(0)
}

/// Load the parameters for `action` and prove them against `right`.
pub fn generate(
    engine: &ProofEngine,
    action: ActionArg,
    right: &ExecutionRight,
    params: &Path,
) -> Result<ActionProof> {
    let proof: ActionProof = match action {
        ActionArg::Swap => engine
            .prove_swap(right, &load_document::<SwapParams>(params)?)?
            .into(),
        ActionArg::Yield => engine
            .prove_yield(right, &load_document::<YieldParams>(params)?)?
            .into(),
        ActionArg::Perp => engine
            .prove_perpetual(right, &load_document::<PerpetualParams>(params)?)?
            .into(),
        ActionArg::Settle => engine
            .prove_settlement(right, &load_document::<SettlementParams>(params)?)?
            .into(),
    };
    Ok(proof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{write, RIGHT_JSON, SWAP_JSON};
    use ert_core::ActionType;

    #[test]
    fn prove_writes_proof_document() {
        let dir = tempfile::tempdir().unwrap();
        let args = ProveArgs {
            action: ActionArg::Swap,
            right: write(dir.path(), "right.json", RIGHT_JSON),
            params: write(dir.path(), "swap.json", SWAP_JSON),
            out: Some(dir.path().join("proof.json")),
        };
        assert_eq!(run_prove(&args).unwrap(), 0);

        let proof: ActionProof = load_document(&dir.path().join("proof.json")).unwrap();
        assert_eq!(proof.action(), ActionType::Swap);
        assert!(proof.attestation_records().iter().all(|(_, bit)| *bit));
    }

    #[test]
    fn settlement_params_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let right: ExecutionRight = serde_json::from_str(RIGHT_JSON).unwrap();
        let params = write(
            dir.path(),
            "settle.yaml",
            "starting_capital: 10000\nending_capital: 12000\n",
        );
        let proof = generate(&ProofEngine::default(), ActionArg::Settle, &right, &params).unwrap();
        assert_eq!(proof.action(), ActionType::Settlement);
    }

    #[test]
    fn params_of_the_wrong_shape_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let right: ExecutionRight = serde_json::from_str(RIGHT_JSON).unwrap();
        let params = write(dir.path(), "swap.json", SWAP_JSON);
        assert!(generate(&ProofEngine::default(), ActionArg::Perp, &right, &params).is_err());
    }

    #[test]
    fn malformed_address_fails_generation() {
        let dir = tempfile::tempdir().unwrap();
        let right: ExecutionRight = serde_json::from_str(RIGHT_JSON).unwrap();
        let params = write(dir.path(), "swap.json", &SWAP_JSON.replace("00a1", "zzzz"));
        let err = generate(&ProofEngine::default(), ActionArg::Swap, &right, &params).unwrap_err();
        assert!(err.to_string().contains("invalid address"));
    }
}

//! # Verify Subcommand
//!
//! Checks a proof document and reports every verification check. An
//! optional right document enables the allow-list root cross-check.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use ert_core::{ExecutionRight, InMemoryRegistry};
use ert_zkp::{ActionProof, PolicyMode, ProofPolicy, ProofVerifier, VerificationResult};

use crate::{load_document, EXIT_REJECTED};

/// Arguments for `ert verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Proof document produced by `ert prove`.
    #[arg(long)]
    pub proof: PathBuf,
    /// Execution right to cross-check allow-list roots against.
    #[arg(long)]
    pub right: Option<PathBuf>,
    /// Proof policy (`production` or `development`). Defaults to
    /// `ERT_PROOF_POLICY`, then the build profile.
    #[arg(long)]
    pub policy: Option<PolicyMode>,
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs, json: bool) -> Result<u8> {
    let proof: ActionProof = load_document(&args.proof)?;
    let policy = args
        .policy
        .map(ProofPolicy::new)
        .unwrap_or_else(ProofPolicy::from_environment);

    let mut verifier = ProofVerifier::new(policy);
    if let Some(path) = &args.right {
        let right: ExecutionRight = load_document(path)?;
        let registry = InMemoryRegistry::new();
        registry.upsert(right);
        verifier = verifier.with_registry(Arc::new(registry));
    }

    let result = verifier.verify(&proof);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&proof, &result);
    }
    Ok(if result.valid { 0 } else { EXIT_REJECTED })
}

/// Print a human-readable check list.
pub fn print_report(proof: &ActionProof, result: &VerificationResult) {
    let verdict = if result.valid { "VALID" } else { "INVALID" };
    println!(
        "{verdict}: {} proof for {} ({:.2} ms)",
        proof.action(),
        proof.ert_id(),
        result.verification_time_ms
    );
    for detail in &result.details {
        let mark = if detail.passed { "ok" } else { "FAIL" };
        println!("  [{mark}] {}: {}", detail.check, detail.message);
    }
}

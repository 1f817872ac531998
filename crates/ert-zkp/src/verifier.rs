//! # Proof Verifier
//!
//! Decides whether a proof may gate an action. Runs every check and
//! records each as a [`VerificationDetail`]; the verdict is the
//! conjunction of all of them, with no partial credit.
//!
//! ## Checks
//!
//! - **Structural**: protocol label names a known backend the policy
//!   accepts; action tag agrees with the typed proof; proof hash is
//!   well-formed and matches its recomputation; signals are non-empty and
//!   have the action's layout; triple arities; commitments non-zero and
//!   equal to their signal positions; the backend accepts the triple.
//! - **Signal consistency**: every attestation bit is exactly 0 or 1 and
//!   equals its attestation record.
//! - **Public-input binding**: typed public inputs equal their signals.
//! - **Compliance**: every attestation record is true.
//! - **Settlement**: PnL and fee split re-derived from public inputs.
//! - **Registry**: with a registry attached, compliance proofs are checked
//!   against the registry's current copy of the right. The right must be
//!   live at verification time, roots recomputed from its allow-lists must
//!   match the proof's roots, and a perpetual proof's published caps may
//!   not exceed the right's current caps.
//!
//! Verification never returns an error. Callers gate on
//! [`VerificationResult::valid`]; details are for audit only.

use std::sync::Arc;
use std::time::Instant;

use ert_core::{ActionType, ExecutionRight, RightsRegistry, Timestamp};
use ert_crypto::AllowListCommitment;
use serde::{Deserialize, Serialize};

use crate::engine::{fees_balance, pnl_balances};
use crate::hash_mix::HashMixBackend;
use crate::layout::{SignalLayout, ACTION_COMMITMENT, OWNERSHIP_COMMITMENT};
use crate::policy::{ProofBackend, ProofPolicy};
use crate::proof::{is_well_formed_hash, ActionProof, SettlementProof};
use crate::traits::{AttestationBackend, Statement, VerifyError};

/// One named check and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationDetail {
    /// Check name.
    pub check: String,
    /// Whether it passed.
    pub passed: bool,
    /// Human-readable outcome.
    pub message: String,
}

/// Outcome of verifying one proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// The verdict.
    pub valid: bool,
    /// Wall-clock verification time.
    pub verification_time_ms: f64,
    /// Every check that ran.
    pub details: Vec<VerificationDetail>,
}

impl VerificationResult {
    /// Names of the checks that failed.
    pub fn failures(&self) -> Vec<&str> {
        self.details
            .iter()
            .filter(|d| !d.passed)
            .map(|d| d.check.as_str())
            .collect()
    }
}

#[derive(Default)]
struct Checks(Vec<VerificationDetail>);

impl Checks {
    fn record(&mut self, check: &str, passed: bool, message: impl Into<String>) {
        self.0.push(VerificationDetail {
            check: check.to_string(),
            passed,
            message: message.into(),
        });
    }

    fn all_passed(&self) -> bool {
        self.0.iter().all(|d| d.passed)
    }
}

/// Verifies proofs under a policy, optionally cross-checking a registry.
#[derive(Clone)]
pub struct ProofVerifier {
    policy: ProofPolicy,
    hash_mix: HashMixBackend,
    registry: Option<Arc<dyn RightsRegistry>>,
}

impl std::fmt::Debug for ProofVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofVerifier")
            .field("policy", &self.policy)
            .field("registry", &self.registry.is_some())
            .finish()
    }
}

impl ProofVerifier {
    /// Verifier under `policy`, without a registry.
    pub fn new(policy: ProofPolicy) -> Self {
        Self {
            policy,
            hash_mix: HashMixBackend,
            registry: None,
        }
    }

    /// Attach a registry for the liveness, root, and limit cross-checks.
    pub fn with_registry(mut self, registry: Arc<dyn RightsRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Active policy.
    pub fn policy(&self) -> ProofPolicy {
        self.policy
    }

    /// Verify any proof at the current time.
    pub fn verify(&self, proof: &ActionProof) -> VerificationResult {
        self.verify_at(proof, Timestamp::now())
    }

    /// Verify any proof as of `now`. Only the registry liveness check
    /// depends on the time.
    pub fn verify_at(&self, proof: &ActionProof, now: Timestamp) -> VerificationResult {
        let started = Instant::now();
        let mut checks = Checks::default();

        self.check_structure(proof, &mut checks);
        check_signal_consistency(proof, &mut checks);
        check_public_bindings(proof, &mut checks);
        check_compliance(proof, &mut checks);
        if let ActionProof::Settlement(p) = proof {
            check_settlement(p, &mut checks);
        }
        self.check_registry(proof, now, &mut checks);

        let valid = checks.all_passed();
        let result = VerificationResult {
            valid,
            verification_time_ms: started.elapsed().as_secs_f64() * 1_000.0,
            details: checks.0,
        };
        if !valid {
            tracing::warn!(
                ert_id = %proof.ert_id(),
                action = %proof.action(),
                proof_hash = %proof.proof_hash(),
                failures = ?result.failures(),
                "proof rejected"
            );
        }
        result
    }

    fn backend_for(&self, backend: ProofBackend) -> Result<&dyn AttestationBackend, VerifyError> {
        match backend {
            ProofBackend::HashMix => Ok(&self.hash_mix),
            other => Err(VerifyError::Unavailable(other)),
        }
    }

    fn check_structure(&self, proof: &ActionProof, checks: &mut Checks) {
        let data = proof.data();
        let layout = SignalLayout::for_action(proof.action());

        let backend = ProofBackend::from_name(&data.protocol);
        match backend {
            Some(b) => {
                checks.record("Protocol", true, format!("protocol {b}"));
                match self.policy.validate(b) {
                    Ok(()) => checks.record("Proof Policy", true, "backend accepted"),
                    Err(e) => checks.record("Proof Policy", false, e.to_string()),
                }
            }
            None => checks.record(
                "Protocol",
                false,
                format!("unrecognized protocol {:?}", data.protocol),
            ),
        }

        checks.record(
            "Action Type",
            data.action == proof.action(),
            format!("envelope {} / proof {}", data.action, proof.action()),
        );

        let hash_ok = is_well_formed_hash(&data.proof_hash) && data.recompute_hash() == data.proof_hash;
        checks.record(
            "Proof Hash",
            hash_ok,
            if hash_ok {
                "digest matches triple and signals"
            } else {
                "digest malformed or does not match"
            },
        );

        let n = data.public_signals.len();
        checks.record(
            "Signal Layout",
            n > 0 && n == layout.signal_count(),
            format!("{n} signals, {} expected", layout.signal_count()),
        );

        let commitments_ok = !data.ownership_commitment.is_zero()
            && !data.action_commitment.is_zero()
            && data.signal(OWNERSHIP_COMMITMENT) == Some(data.ownership_commitment)
            && data.signal(ACTION_COMMITMENT) == Some(data.action_commitment);
        checks.record(
            "Commitments",
            commitments_ok,
            if commitments_ok {
                "non-zero and published"
            } else {
                "zero or not matching published signals"
            },
        );

        let triple = match data.triple() {
            Ok(t) => {
                checks.record("Proof Arity", true, "pi_a 2, pi_b 2x2, pi_c 2");
                t
            }
            Err(e) => {
                checks.record("Proof Arity", false, e.to_string());
                return;
            }
        };

        let Some(backend) = backend else {
            return;
        };
        let roots = data.roots().unwrap_or(&[]);
        let statement = Statement {
            action: data.action,
            ownership_commitment: data.ownership_commitment,
            action_commitment: data.action_commitment,
            roots,
            public_signals: &data.public_signals,
        };
        let outcome = self
            .backend_for(backend)
            .and_then(|b| b.verify(&statement, &triple));
        match outcome {
            Ok(true) => checks.record("Backend Verification", true, "triple verifies"),
            Ok(false) => checks.record("Backend Verification", false, "triple does not verify"),
            Err(e) => checks.record("Backend Verification", false, e.to_string()),
        }
    }

    fn check_registry(&self, proof: &ActionProof, now: Timestamp, checks: &mut Checks) {
        if !proof.action().is_compliance() {
            return;
        }
        let right = self
            .registry
            .as_ref()
            .and_then(|r| r.right(proof.ert_id()));
        let Some(right) = right else {
            checks.record(
                "Allow-list Root",
                true,
                "registry unavailable; root cross-check skipped",
            );
            return;
        };

        let live = right.is_live(now);
        checks.record(
            "Right Status",
            live,
            format!(
                "{} is {:?}, expires {}",
                right.id, right.status, right.expires_at
            ),
        );

        let expected: Vec<_> = allow_lists(proof.action(), &right)
            .into_iter()
            .map(|c| c.root)
            .collect();
        let matches = proof.data().roots() == Some(expected.as_slice());
        checks.record(
            "Allow-list Root",
            matches,
            if matches {
                "roots match registry allow-lists"
            } else {
                "roots differ from registry allow-lists"
            },
        );

        if let ActionProof::Perpetual(p) = proof {
            let inputs = &p.public_inputs;
            let within = inputs.max_leverage <= right.max_leverage
                && inputs.max_position_size <= right.max_position_size;
            checks.record(
                "Right Limits",
                within,
                format!(
                    "proof caps leverage {} size {}, registry caps leverage {} size {}",
                    inputs.max_leverage,
                    inputs.max_position_size,
                    right.max_leverage,
                    right.max_position_size
                ),
            );
        }
    }
}

impl Default for ProofVerifier {
    fn default() -> Self {
        Self::new(ProofPolicy::from_environment())
    }
}

fn allow_lists(action: ActionType, right: &ExecutionRight) -> Vec<AllowListCommitment> {
    match action {
        ActionType::Swap | ActionType::Yield => vec![
            AllowListCommitment::from_addresses(&right.allowed_adapters),
            AllowListCommitment::from_addresses(&right.allowed_assets),
        ],
        ActionType::Perpetual => vec![AllowListCommitment::from_addresses(&right.allowed_assets)],
        ActionType::Settlement => Vec::new(),
    }
}

fn check_signal_consistency(proof: &ActionProof, checks: &mut Checks) {
    let signals = proof.data().attestation_signals();
    for (i, (label, record)) in proof.attestation_records().into_iter().enumerate() {
        let published = signals.get(i).copied().flatten();
        let ok = published == Some(record);
        checks.record(
            &format!("Signal: {label}"),
            ok,
            match published {
                Some(bit) => format!("signal {bit}, record {record}"),
                None => format!("signal missing or not 0/1, record {record}"),
            },
        );
    }
}

fn check_public_bindings(proof: &ActionProof, checks: &mut Checks) {
    let data = proof.data();
    let mismatched: Vec<usize> = proof
        .public_bindings()
        .into_iter()
        .filter(|(i, v)| data.signal(*i) != Some(*v))
        .map(|(i, _)| i)
        .collect();
    checks.record(
        "Public Inputs",
        mismatched.is_empty(),
        if mismatched.is_empty() {
            "typed inputs match signals".to_string()
        } else {
            format!("signals {mismatched:?} differ from typed inputs")
        },
    );
}

fn check_compliance(proof: &ActionProof, checks: &mut Checks) {
    for (label, record) in proof.attestation_records() {
        checks.record(
            &format!("Attestation: {label}"),
            record,
            if record { "attested" } else { "not attested" },
        );
    }
}

fn check_settlement(proof: &SettlementProof, checks: &mut Checks) {
    let p = &proof.public_inputs;
    let pnl_ok = pnl_balances(p.starting_capital, p.ending_capital, p.pnl);
    checks.record(
        "PnL Calculation",
        pnl_ok,
        format!("{} - {} vs pnl {}", p.ending_capital, p.starting_capital, p.pnl),
    );
    let fee_ok = fees_balance(
        p.starting_capital,
        p.ending_capital,
        p.pnl,
        p.lp_share,
        p.executor_share,
    );
    checks.record(
        "Fee Distribution",
        fee_ok,
        format!("lp {} + executor {} vs ending {}", p.lp_share, p.executor_share, p.ending_capital),
    );
}

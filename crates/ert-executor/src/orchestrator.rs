//! # Execution Orchestrator
//!
//! Drives one request through generate, verify, and execute, tracking its
//! [`ExecutionLifecycle`] and recording exactly one history entry when it
//! reaches a terminal phase.
//!
//! Failures at any stage are caught here: the request moves to `Failed`,
//! the history entry keeps the error message, and the caller receives an
//! [`ExecutionResult`] with `success: false`. No stage is retried.

use std::sync::Arc;

use ert_core::{ActionType, ErtId, ExecutionRight, StateError};
use ert_state::{ExecutionLifecycle, ExecutionPhase, HistoryEntry, HistoryStore};
use ert_zkp::{
    ActionProof, PerpetualParams, ProofEngine, ProofError, ProofVerifier, SettlementParams,
    SwapParams, VerificationResult, YieldParams,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ExecutorConfig;
use crate::gateway::{ExecutionGateway, GatewayError, SimulatedGateway, SubmissionRequest};

/// What an `execute_*` call returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the gateway executed the action.
    pub success: bool,
    /// Gateway transaction hash.
    pub tx_hash: Option<String>,
    /// Proof digest, when generation succeeded.
    pub proof_hash: Option<String>,
    /// Verifier outcome, when verification ran.
    pub verification: Option<VerificationResult>,
    /// Failure message.
    pub error: Option<String>,
    /// Id of the history entry recorded for this request.
    pub history_id: Uuid,
}

/// Why a request failed.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// The engine could not produce a proof.
    #[error("proof generation failed: {0}")]
    Proof(#[from] ProofError),
    /// The verifier judged the proof invalid; carries the failed checks.
    #[error("proof rejected by verifier: {0}")]
    Rejected(String),
    /// The gateway did not execute the verified action.
    #[error("execution failed: {0}")]
    Gateway(#[from] GatewayError),
    /// The lifecycle refused a phase transition.
    #[error(transparent)]
    State(#[from] StateError),
}

struct Outcome {
    proof_hash: String,
    tx_hash: String,
    verification: VerificationResult,
}

struct Failure {
    proof_hash: Option<String>,
    verification: Option<VerificationResult>,
    error: ExecutionError,
}

impl Failure {
    fn at(proof_hash: Option<&str>, error: impl Into<ExecutionError>) -> Self {
        Self {
            proof_hash: proof_hash.map(str::to_string),
            verification: None,
            error: error.into(),
        }
    }
}

/// Generates, verifies, and executes actions against execution rights.
pub struct ExecutionOrchestrator {
    engine: ProofEngine,
    verifier: ProofVerifier,
    gateway: Arc<dyn ExecutionGateway>,
    history: Arc<HistoryStore>,
}

impl std::fmt::Debug for ExecutionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionOrchestrator")
            .field("engine", &self.engine)
            .field("verifier", &self.verifier)
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl ExecutionOrchestrator {
    /// Assemble an orchestrator from its collaborators.
    pub fn new(
        engine: ProofEngine,
        verifier: ProofVerifier,
        gateway: Arc<dyn ExecutionGateway>,
        history: Arc<HistoryStore>,
    ) -> Self {
        Self {
            engine,
            verifier,
            gateway,
            history,
        }
    }

    /// OS-seeded engine, verifier under the configured policy, simulated
    /// gateway, and a fresh history of the configured capacity.
    pub fn from_config(config: &ExecutorConfig) -> Self {
        Self::new(
            ProofEngine::default(),
            ProofVerifier::new(config.proof_policy),
            Arc::new(SimulatedGateway::new(
                config.sim_latency_min,
                config.sim_latency_max,
            )),
            Arc::new(HistoryStore::new(config.history_capacity)),
        )
    }

    /// The injected history store.
    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Prove, verify, and execute a swap.
    pub async fn execute_swap(&self, right: &ExecutionRight, params: &SwapParams) -> ExecutionResult {
        self.run(right.id, ActionType::Swap, |engine| {
            engine.prove_swap(right, params).map(ActionProof::from)
        })
        .await
    }

    /// Prove, verify, and execute a yield deposit or withdrawal.
    pub async fn execute_yield(&self, right: &ExecutionRight, params: &YieldParams) -> ExecutionResult {
        self.run(right.id, ActionType::Yield, |engine| {
            engine.prove_yield(right, params).map(ActionProof::from)
        })
        .await
    }

    /// Prove, verify, and execute a perpetual position.
    pub async fn execute_perpetual(
        &self,
        right: &ExecutionRight,
        params: &PerpetualParams,
    ) -> ExecutionResult {
        self.run(right.id, ActionType::Perpetual, |engine| {
            engine.prove_perpetual(right, params).map(ActionProof::from)
        })
        .await
    }

    /// Prove, verify, and execute a settlement.
    pub async fn execute_settlement(
        &self,
        right: &ExecutionRight,
        params: &SettlementParams,
    ) -> ExecutionResult {
        self.run(right.id, ActionType::Settlement, |engine| {
            engine.prove_settlement(right, params).map(ActionProof::from)
        })
        .await
    }

    /// Up to `limit` history entries, most recent first.
    pub fn execution_history(&self, limit: usize) -> Vec<HistoryEntry> {
        self.history.recent(limit)
    }

    /// Remove every history entry.
    pub fn clear_execution_history(&self) {
        self.history.clear();
    }

    async fn run<F>(&self, ert_id: ErtId, action: ActionType, generate: F) -> ExecutionResult
    where
        F: FnOnce(&ProofEngine) -> Result<ActionProof, ProofError>,
    {
        let description = format!("{action} for {ert_id}");
        let mut lifecycle = ExecutionLifecycle::new();
        tracing::info!(ert_id = %ert_id, action = %action, "execution started");

        match self.drive(&mut lifecycle, generate).await {
            Ok(outcome) => {
                let entry = HistoryEntry::completed(
                    ert_id,
                    action,
                    outcome.proof_hash.clone(),
                    outcome.tx_hash.clone(),
                    description,
                );
                let history_id = self.history.record(entry);
                tracing::info!(
                    ert_id = %ert_id,
                    action = %action,
                    proof_hash = %outcome.proof_hash,
                    tx_hash = %outcome.tx_hash,
                    "execution completed"
                );
                ExecutionResult {
                    success: true,
                    tx_hash: Some(outcome.tx_hash),
                    proof_hash: Some(outcome.proof_hash),
                    verification: Some(outcome.verification),
                    error: None,
                    history_id,
                }
            }
            Err(failure) => {
                if let Err(e) = lifecycle.try_transition(ExecutionPhase::Failed) {
                    tracing::debug!(error = %e, "lifecycle already terminal");
                }
                let message = failure.error.to_string();
                let entry = HistoryEntry::failed(
                    ert_id,
                    action,
                    failure.proof_hash.clone(),
                    description,
                    message.clone(),
                );
                let history_id = self.history.record(entry);
                tracing::error!(
                    ert_id = %ert_id,
                    action = %action,
                    proof_hash = ?failure.proof_hash,
                    error = %message,
                    "execution failed"
                );
                ExecutionResult {
                    success: false,
                    tx_hash: None,
                    proof_hash: failure.proof_hash,
                    verification: failure.verification,
                    error: Some(message),
                    history_id,
                }
            }
        }
    }

    async fn drive<F>(
        &self,
        lifecycle: &mut ExecutionLifecycle,
        generate: F,
    ) -> Result<Outcome, Failure>
    where
        F: FnOnce(&ProofEngine) -> Result<ActionProof, ProofError>,
    {
        lifecycle
            .try_transition(ExecutionPhase::GeneratingProof)
            .map_err(|e| Failure::at(None, e))?;
        let proof = generate(&self.engine).map_err(|e| Failure::at(None, e))?;
        let proof_hash = proof.proof_hash().to_string();

        lifecycle
            .try_transition(ExecutionPhase::Verifying)
            .map_err(|e| Failure::at(Some(&proof_hash), e))?;
        let verification = self.verifier.verify(&proof);
        if !verification.valid {
            let reasons = verification.failures().join(", ");
            return Err(Failure {
                proof_hash: Some(proof_hash),
                verification: Some(verification),
                error: ExecutionError::Rejected(reasons),
            });
        }

        lifecycle
            .try_transition(ExecutionPhase::Executing)
            .map_err(|e| Failure::at(Some(&proof_hash), e))?;
        let request = SubmissionRequest {
            proof_bytes: proof.data().to_calldata(),
            public_inputs: proof.data().public_signals.clone(),
        };
        let tx_hash = match self.gateway.submit(request).await {
            Ok(tx) => tx,
            Err(e) => {
                return Err(Failure {
                    proof_hash: Some(proof_hash),
                    verification: Some(verification),
                    error: e.into(),
                })
            }
        };

        lifecycle
            .try_transition(ExecutionPhase::Completed)
            .map_err(|e| Failure::at(Some(&proof_hash), e))?;
        Ok(Outcome {
            proof_hash,
            tx_hash,
            verification,
        })
    }
}

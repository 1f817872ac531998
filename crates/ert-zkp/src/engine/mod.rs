//! # Proof Engine
//!
//! Builds proofs binding a pending action to an execution right. Every
//! compliance proof runs the same pipeline:
//!
//! 1. Field-encode every private parameter. Failure aborts generation.
//! 2. Check and prove allow-list inclusion for each governed parameter.
//! 3. Evaluate numeric predicates against the right's current limits,
//!    gating every attestation on `right.is_live(now)`.
//! 4. Draw fresh blinding factors and form the ownership commitment
//!    `commitment([ert_id, blind0])` and the action commitment
//!    `commitment([ert_id, tag, H(private values), timestamp, blind1])`.
//! 5. Assemble the public signals and hand the statement and witness to
//!    the attestation backend for the proof triple.
//!
//! A non-compliant action still yields a complete proof; its attestation
//! bits are simply false. Settlement proofs attest arithmetic correctness
//! instead and skip steps 2 and 3.
//!
//! ## Concurrency
//!
//! The engine holds no mutable state besides its blinding source, which
//! is `Send + Sync`. One engine can serve concurrent requests.

mod perpetual;
mod settlement;
mod swap;
mod yield_action;

pub use settlement::{
    fees_balance, pnl_balances, SettlementBreakdown, BASE_FEE_BPS, BPS_DENOMINATOR,
    PERFORMANCE_FEE_BPS,
};

use std::sync::Arc;

use ert_core::{ActionType, Address, ErtId, ExecutionRight, RightsRegistry, Timestamp};
use ert_crypto::{
    commitment, hash_fields, BlindingSource, FieldElement, InclusionCheck, MerkleProof,
    OsBlindingSource,
};

use crate::hash_mix::HashMixBackend;
use crate::layout::{SignalLayout, HEADER_LEN};
use crate::policy::ProofBackend;
use crate::proof::{timestamp_to_field, ProofData};
use crate::traits::{AttestationBackend, ProofError, Statement};
use crate::witness::ProofWitness;

/// Generates proofs for every action type.
#[derive(Debug, Clone)]
pub struct ProofEngine {
    backend: HashMixBackend,
    blinding: Arc<dyn BlindingSource>,
}

impl ProofEngine {
    /// Engine drawing blinding factors from `blinding`.
    pub fn new(blinding: Arc<dyn BlindingSource>) -> Self {
        Self {
            backend: HashMixBackend,
            blinding,
        }
    }

    /// Backend whose label the engine's proofs carry.
    pub fn backend(&self) -> ProofBackend {
        self.backend.backend()
    }

    /// Commit, assemble signals, and run the backend.
    fn seal(&self, draft: Draft) -> Result<ProofData, ProofError> {
        let layout = SignalLayout::for_action(draft.action);
        let blinding = [self.blinding.next_element(), self.blinding.next_element()];

        let ert_id = FieldElement::from_u64(draft.ert_id.value());
        let timestamp = timestamp_to_field(draft.timestamp);
        let ownership_commitment = commitment(&[ert_id, blinding[0]]);
        let data_hash = hash_fields(&draft.private_values);
        let action_commitment = commitment(&[
            ert_id,
            FieldElement::from_u64(draft.action.tag()),
            data_hash,
            timestamp,
            blinding[1],
        ]);

        let mut public_signals = Vec::with_capacity(layout.signal_count());
        public_signals.extend([ert_id, timestamp, ownership_commitment, action_commitment]);
        public_signals.extend_from_slice(&draft.roots);
        public_signals.extend_from_slice(&draft.public_values);
        public_signals.extend(draft.bits.iter().copied().map(FieldElement::from_bool));
        if public_signals.len() != layout.signal_count() || draft.roots.len() != layout.roots {
            return Err(ProofError::GenerationFailed(format!(
                "{} signals do not match the {} layout ({} expected after a {HEADER_LEN}-signal header)",
                public_signals.len(),
                draft.action,
                layout.signal_count(),
            )));
        }

        let witness = ProofWitness::new(draft.private_values, &draft.inclusions, blinding);
        let statement = Statement {
            action: draft.action,
            ownership_commitment,
            action_commitment,
            roots: &draft.roots,
            public_signals: &public_signals,
        };
        let triple = self.backend.prove(&statement, &witness)?;

        let data = ProofData::new(
            self.backend().name(),
            draft.action,
            ownership_commitment,
            action_commitment,
            &triple,
            public_signals,
        );
        tracing::debug!(
            ert_id = %draft.ert_id,
            action = %draft.action,
            proof_hash = %data.proof_hash,
            "proof generated"
        );
        Ok(data)
    }
}

impl Default for ProofEngine {
    fn default() -> Self {
        Self::new(Arc::new(OsBlindingSource))
    }
}

/// Everything the common pipeline needs from an action-specific prover.
struct Draft {
    action: ActionType,
    ert_id: ErtId,
    timestamp: Timestamp,
    private_values: Vec<FieldElement>,
    inclusions: Vec<MerkleProof>,
    roots: Vec<FieldElement>,
    public_values: Vec<FieldElement>,
    bits: Vec<bool>,
}

fn encode_allow_list(list: &[Address]) -> Vec<FieldElement> {
    list.iter().map(FieldElement::from_address).collect()
}

fn inclusion_paths<'a>(checks: impl IntoIterator<Item = &'a InclusionCheck>) -> Vec<MerkleProof> {
    checks
        .into_iter()
        .filter_map(|c| c.proof.clone())
        .collect()
}

/// `amount <= max_position_size` and `amount <= available_capital`.
fn amount_within_limits(right: &ExecutionRight, amount: u128) -> bool {
    amount <= right.max_position_size && amount <= right.available_capital
}

/// Fetch a right for a `prove_*_from_registry` call.
fn fetch_right(registry: &dyn RightsRegistry, id: ErtId) -> Option<ExecutionRight> {
    let right = registry.right(id);
    if right.is_none() {
        tracing::warn!(ert_id = %id, "execution right unavailable from registry");
    }
    right
}

#[cfg(test)]
pub(crate) mod fixtures {
    use ert_core::{Address, ErtId, ExecutionRight, RightStatus, Timestamp};

    pub fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    pub fn now() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    pub fn right() -> ExecutionRight {
        ExecutionRight {
            id: ErtId(7),
            executor: addr("0xe0"),
            available_capital: 10_000,
            allowed_adapters: vec![addr("0xa1"), addr("0xa2")],
            allowed_assets: vec![addr("0xb1"), addr("0xb2"), addr("0xb3")],
            max_position_size: 1_000,
            max_leverage: 5,
            status: RightStatus::Active,
            expires_at: Timestamp::parse("2026-06-01T00:00:00Z").unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::layout::{ACTION_COMMITMENT, OWNERSHIP_COMMITMENT};
    use crate::params::SwapParams;
    use ert_core::InMemoryRegistry;
    use ert_crypto::SeededBlindingSource;

    fn params() -> SwapParams {
        SwapParams {
            adapter: "0xa1".into(),
            token_in: "0xb1".into(),
            token_out: "0xb2".into(),
            amount_in: 500,
            min_amount_out: 490,
        }
    }

    #[test]
    fn header_signals_carry_commitments() {
        let engine = ProofEngine::default();
        let proof = engine.prove_swap_at(&right(), &params(), now()).unwrap();
        let data = &proof.proof;
        assert_eq!(data.signal(0), Some(FieldElement::from_u64(7)));
        assert_eq!(data.signal(OWNERSHIP_COMMITMENT), Some(data.ownership_commitment));
        assert_eq!(data.signal(ACTION_COMMITMENT), Some(data.action_commitment));
        assert_eq!(data.protocol, "hash-mix-sha256");
    }

    #[test]
    fn fresh_blinding_per_proof() {
        let engine = ProofEngine::default();
        let a = engine.prove_swap_at(&right(), &params(), now()).unwrap();
        let b = engine.prove_swap_at(&right(), &params(), now()).unwrap();
        assert_ne!(a.proof.ownership_commitment, b.proof.ownership_commitment);
        assert_ne!(a.proof.proof_hash, b.proof.proof_hash);
        assert_eq!(a.attestations, b.attestations);
    }

    #[test]
    fn seeded_engines_are_reproducible() {
        let a = ProofEngine::new(Arc::new(SeededBlindingSource::new(42)));
        let b = ProofEngine::new(Arc::new(SeededBlindingSource::new(42)));
        let pa = a.prove_swap_at(&right(), &params(), now()).unwrap();
        let pb = b.prove_swap_at(&right(), &params(), now()).unwrap();
        assert_eq!(pa, pb);
    }

    #[test]
    fn registry_miss_is_none() {
        let engine = ProofEngine::default();
        let registry = InMemoryRegistry::new();
        assert!(engine
            .prove_swap_from_registry(&registry, ErtId(7), &params())
            .unwrap()
            .is_none());
        registry.upsert(right());
        assert!(engine
            .prove_swap_from_registry(&registry, ErtId(7), &params())
            .unwrap()
            .is_some());
    }
}

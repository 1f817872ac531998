//! # ert-zkp — Attestation Layer
//!
//! Produces and checks proofs that bind a pending action (swap, yield,
//! perpetual, settlement) to an execution right without revealing the
//! action's private parameters.
//!
//! ## Architecture
//!
//! The [`AttestationBackend`] trait is the only backend-specific step: it
//! turns a public statement and a private witness into the proof triple.
//! Phase 1 ships [`HashMixBackend`], a Verifiable Commitment + Policy
//! Attestation envelope with no soundness of its own. A constraint-system
//! backend slots in behind the same trait without changing [`ProofData`].
//!
//! Around the backend:
//!
//! - [`ProofEngine`] encodes parameters, proves allow-list inclusion,
//!   evaluates limits, commits, and assembles public signals.
//! - [`ProofVerifier`] runs structural, signal-consistency, binding,
//!   compliance, settlement, and registry checks.
//! - [`ProofPolicy`] decides which backends a deployment accepts.
//!
//! ## Crate Policy
//!
//! - Witnesses are never serialized and are zeroized on drop.
//! - Non-compliance is reported through attestation bits, never as an
//!   error. Only malformed input fails generation.
//! - Verification never fails with an error; it returns a verdict.

pub mod engine;
pub mod hash_mix;
pub mod layout;
pub mod params;
pub mod policy;
pub mod proof;
pub mod traits;
pub mod verifier;
pub mod witness;

// Re-export primary types.
pub use engine::{ProofEngine, SettlementBreakdown};
pub use hash_mix::HashMixBackend;
pub use layout::SignalLayout;
pub use params::{
    PerpetualParams, PositionSide, SettlementParams, SwapParams, YieldDirection, YieldParams,
};
pub use policy::{PolicyError, PolicyMode, ProofBackend, ProofPolicy};
pub use proof::{
    ActionProof, AttestationSet, PerpetualAttestations, PerpetualProof, PerpetualPublicInputs,
    Proof, ProofData, SettlementAttestations, SettlementProof, SettlementPublicInputs,
    SwapAttestations, SwapProof, SwapPublicInputs, YieldAttestations, YieldProof,
    YieldPublicInputs,
};
pub use traits::{AttestationBackend, ProofError, PseudoProof, Statement, VerifyError};
pub use verifier::{ProofVerifier, VerificationDetail, VerificationResult};
pub use witness::ProofWitness;

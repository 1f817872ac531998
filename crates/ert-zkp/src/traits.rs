//! # Attestation Backend Trait (Sealed)
//!
//! The step of proof generation that turns a statement and its witness
//! into the `pi_a / pi_b / pi_c` triple. Everything around it (encoding,
//! allow-list inclusion, predicates, commitments, signal assembly) is
//! backend-independent and lives in the engine.
//!
//! ## Sealed Trait
//!
//! Only backends defined in this crate can implement
//! [`AttestationBackend`]. A constraint-system backend with a verifying
//! key can replace [`HashMixBackend`](crate::hash_mix::HashMixBackend)
//! without changing [`ProofData`](crate::proof::ProofData).

use ert_core::{ActionType, CryptoError, EncodingError};
use ert_crypto::FieldElement;
use thiserror::Error;

use crate::policy::ProofBackend;
use crate::witness::ProofWitness;

/// Error during proof generation. Nothing partial is returned.
#[derive(Error, Debug)]
pub enum ProofError {
    /// A private parameter failed field encoding or numeric range checks.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// An allow-list operation rejected its input.
    #[error(transparent)]
    AllowList(#[from] CryptoError),
    /// The backend could not synthesize a proof.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

/// Error during backend verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The proof does not have the backend's shape.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// No verifier for this backend is available in this build.
    #[error("no verifier available for {0}")]
    Unavailable(ProofBackend),
}

/// The public side of a proof as seen by a backend.
#[derive(Debug, Clone, Copy)]
pub struct Statement<'a> {
    /// Action being attested.
    pub action: ActionType,
    /// `commitment([ert_id, blind0])`.
    pub ownership_commitment: FieldElement,
    /// `commitment([ert_id, tag, data_hash, timestamp, blind1])`.
    pub action_commitment: FieldElement,
    /// Allow-list roots, in layout order.
    pub roots: &'a [FieldElement],
    /// Complete public signals.
    pub public_signals: &'a [FieldElement],
}

/// The `pi_a / pi_b / pi_c` triple with fixed arities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PseudoProof {
    /// Two elements.
    pub pi_a: [FieldElement; 2],
    /// Two by two.
    pub pi_b: [[FieldElement; 2]; 2],
    /// Two elements.
    pub pi_c: [FieldElement; 2],
}

mod private {
    /// Sealing marker. Not reachable outside `ert-zkp`.
    pub trait Sealed {}
}

/// Sealed interface of an attestation backend.
///
/// `Send + Sync` so one engine and one verifier can serve concurrent
/// requests.
pub trait AttestationBackend: private::Sealed + Send + Sync + std::fmt::Debug {
    /// Which backend this is. Its name is the proof's protocol label.
    fn backend(&self) -> ProofBackend;

    /// Synthesize the proof triple.
    ///
    /// # Errors
    ///
    /// [`ProofError::GenerationFailed`] if the statement is malformed.
    fn prove(
        &self,
        statement: &Statement<'_>,
        witness: &ProofWitness,
    ) -> Result<PseudoProof, ProofError>;

    /// Check the triple against the public statement.
    ///
    /// `Ok(false)` for a well-formed proof that does not verify.
    ///
    /// # Errors
    ///
    /// [`VerifyError::MalformedProof`] for a structurally invalid statement.
    fn verify(&self, statement: &Statement<'_>, proof: &PseudoProof) -> Result<bool, VerifyError>;
}

impl private::Sealed for crate::hash_mix::HashMixBackend {}

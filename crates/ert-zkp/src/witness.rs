//! # Proof Witness
//!
//! The private half of a proof: encoded action parameters, the Merkle
//! paths for every allow-list-governed parameter, and the blinding
//! factors behind the two commitments.
//!
//! ## Security Invariant
//!
//! A witness is never serialized and its `Debug` output is redacted. All
//! fields are zeroized when the witness is dropped, so private parameters
//! do not outlive the `prove_*` call that created them.

use ert_crypto::{FieldElement, MerkleProof};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Private inputs to an attestation backend.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ProofWitness {
    private_values: Vec<FieldElement>,
    merkle_paths: Vec<Vec<FieldElement>>,
    path_indices: Vec<Vec<bool>>,
    blinding: [FieldElement; 2],
}

impl ProofWitness {
    /// Assemble a witness. `blinding[0]` opens the ownership commitment,
    /// `blinding[1]` the action commitment.
    pub fn new(
        private_values: Vec<FieldElement>,
        inclusions: &[MerkleProof],
        blinding: [FieldElement; 2],
    ) -> Self {
        Self {
            private_values,
            merkle_paths: inclusions.iter().map(|p| p.path.clone()).collect(),
            path_indices: inclusions.iter().map(|p| p.indices.clone()).collect(),
            blinding,
        }
    }

    /// Encoded private parameters, in the action's declared order.
    pub fn private_values(&self) -> &[FieldElement] {
        &self.private_values
    }

    /// Sibling paths of the inclusion proofs.
    pub fn merkle_paths(&self) -> &[Vec<FieldElement>] {
        &self.merkle_paths
    }

    /// Direction flags of the inclusion proofs.
    pub fn path_indices(&self) -> &[Vec<bool>] {
        &self.path_indices
    }

    /// The two commitment blinding factors.
    pub fn blinding(&self) -> &[FieldElement; 2] {
        &self.blinding
    }
}

impl std::fmt::Debug for ProofWitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofWitness")
            .field("private_values", &format_args!("[{} redacted]", self.private_values.len()))
            .field("merkle_paths", &self.merkle_paths.len())
            .finish_non_exhaustive()
    }
}

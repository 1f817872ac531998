//! # Hash-Mix Backend (Phase 1)
//!
//! Builds the proof triple by mixing commitments, blinding factors, and
//! hashes of the private values, inclusion paths, and roots:
//!
//! ```text
//! seed  = H(own, act, b0, b1)
//! ph    = H(private values)      rh = H(roots)
//! pp    = H(H(path_0 ++ dirs_0), H(path_1 ++ dirs_1), ..)
//! pi_a  = [H(seed, ph), H(seed, rh, pp)]
//! pi_b  = [[H(a0, b0), H(a1, b1)], [H(a0, rh), H(a1, ph)]]
//! pi_c  = [H(pi_b.., own), H(pi_b.., H(signals))]
//! ```
//!
//! `pi_c` binds the triple to the commitments and to every public signal,
//! so altering any signal after generation is detected. `pi_a` and `pi_b`
//! cannot be recomputed without the witness.
//!
//! ## Soundness
//!
//! None. There is no constraint system: anyone able to evaluate SHA-256
//! can produce a `pi_c` that verifies for arbitrary signals. The
//! production [`ProofPolicy`](crate::policy::ProofPolicy) rejects this
//! backend.

use ert_crypto::{hash_fields, FieldElement};
use zeroize::Zeroize;

use crate::policy::ProofBackend;
use crate::traits::{AttestationBackend, ProofError, PseudoProof, Statement, VerifyError};
use crate::witness::ProofWitness;

/// SHA-256 hash-mixing attestation backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashMixBackend;

fn flatten(pi_b: &[[FieldElement; 2]; 2]) -> [FieldElement; 4] {
    [pi_b[0][0], pi_b[0][1], pi_b[1][0], pi_b[1][1]]
}

fn seal_c(pi_b: &[[FieldElement; 2]; 2], statement: &Statement<'_>) -> [FieldElement; 2] {
    let b = flatten(pi_b);
    let signals_hash = hash_fields(statement.public_signals);
    [
        hash_fields(&[b[0], b[1], b[2], b[3], statement.ownership_commitment]),
        hash_fields(&[b[0], b[1], b[2], b[3], signals_hash]),
    ]
}

/// Digest of every inclusion path with its direction flags.
fn paths_hash(witness: &ProofWitness) -> FieldElement {
    let per_path: Vec<FieldElement> = witness
        .merkle_paths()
        .iter()
        .zip(witness.path_indices())
        .map(|(path, indices)| {
            let mut words = path.clone();
            words.extend(indices.iter().map(|&right| {
                if right {
                    FieldElement::ONE
                } else {
                    FieldElement::ZERO
                }
            }));
            let digest = hash_fields(&words);
            words.zeroize();
            digest
        })
        .collect();
    hash_fields(&per_path)
}

impl AttestationBackend for HashMixBackend {
    fn backend(&self) -> ProofBackend {
        ProofBackend::HashMix
    }

    fn prove(
        &self,
        statement: &Statement<'_>,
        witness: &ProofWitness,
    ) -> Result<PseudoProof, ProofError> {
        if statement.public_signals.is_empty() {
            return Err(ProofError::GenerationFailed(
                "statement has no public signals".into(),
            ));
        }
        let [b0, b1] = *witness.blinding();
        let seed = hash_fields(&[
            statement.ownership_commitment,
            statement.action_commitment,
            b0,
            b1,
        ]);
        let private_hash = hash_fields(witness.private_values());
        let roots_hash = hash_fields(statement.roots);
        let path_hash = paths_hash(witness);

        let pi_a = [
            hash_fields(&[seed, private_hash]),
            hash_fields(&[seed, roots_hash, path_hash]),
        ];
        let pi_b = [
            [hash_fields(&[pi_a[0], b0]), hash_fields(&[pi_a[1], b1])],
            [
                hash_fields(&[pi_a[0], roots_hash]),
                hash_fields(&[pi_a[1], private_hash]),
            ],
        ];
        let pi_c = seal_c(&pi_b, statement);

        Ok(PseudoProof { pi_a, pi_b, pi_c })
    }

    fn verify(&self, statement: &Statement<'_>, proof: &PseudoProof) -> Result<bool, VerifyError> {
        if statement.public_signals.is_empty() {
            return Err(VerifyError::MalformedProof(
                "statement has no public signals".into(),
            ));
        }
        Ok(seal_c(&proof.pi_b, statement) == proof.pi_c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ert_core::ActionType;

    fn statement<'a>(roots: &'a [FieldElement], signals: &'a [FieldElement]) -> Statement<'a> {
        Statement {
            action: ActionType::Swap,
            ownership_commitment: FieldElement::from_u64(11),
            action_commitment: FieldElement::from_u64(12),
            roots,
            public_signals: signals,
        }
    }

    fn witness() -> ProofWitness {
        ProofWitness::new(
            vec![FieldElement::from_u64(500)],
            &[],
            [FieldElement::from_u64(3), FieldElement::from_u64(4)],
        )
    }

    #[test]
    fn proof_verifies_against_its_statement() {
        let roots = [FieldElement::from_u64(1)];
        let signals = [FieldElement::from_u64(9), FieldElement::ONE];
        let s = statement(&roots, &signals);
        let proof = HashMixBackend.prove(&s, &witness()).unwrap();
        assert!(HashMixBackend.verify(&s, &proof).unwrap());
    }

    #[test]
    fn altered_signal_breaks_binding() {
        let roots = [FieldElement::from_u64(1)];
        let signals = [FieldElement::from_u64(9), FieldElement::ONE];
        let proof = HashMixBackend
            .prove(&statement(&roots, &signals), &witness())
            .unwrap();
        let tampered = [FieldElement::from_u64(9), FieldElement::ZERO];
        assert!(!HashMixBackend
            .verify(&statement(&roots, &tampered), &proof)
            .unwrap());
    }

    #[test]
    fn blinding_changes_the_triple() {
        let roots = [];
        let signals = [FieldElement::ONE];
        let s = statement(&roots, &signals);
        let a = HashMixBackend.prove(&s, &witness()).unwrap();
        let other = ProofWitness::new(
            vec![FieldElement::from_u64(500)],
            &[],
            [FieldElement::from_u64(5), FieldElement::from_u64(6)],
        );
        let b = HashMixBackend.prove(&s, &other).unwrap();
        assert_ne!(a.pi_a, b.pi_a);
    }

    #[test]
    fn inclusion_paths_feed_the_triple() {
        let leaves: Vec<FieldElement> = (1..=4).map(FieldElement::from_u64).collect();
        let roots = [ert_crypto::build_merkle_root(&leaves)];
        let signals = [FieldElement::ONE];
        let s = statement(&roots, &signals);
        let blinding = [FieldElement::from_u64(3), FieldElement::from_u64(4)];
        let with_path = |index| {
            let path = ert_crypto::generate_merkle_proof(&leaves, index).unwrap();
            ProofWitness::new(vec![FieldElement::from_u64(500)], &[path], blinding)
        };

        let first = HashMixBackend.prove(&s, &with_path(0)).unwrap();
        let again = HashMixBackend.prove(&s, &with_path(0)).unwrap();
        let other = HashMixBackend.prove(&s, &with_path(3)).unwrap();
        assert_eq!(first, again);
        assert_eq!(first.pi_a[0], other.pi_a[0]);
        assert_ne!(first.pi_a[1], other.pi_a[1]);
        assert!(HashMixBackend.verify(&s, &other).unwrap());
    }

    #[test]
    fn empty_signals_rejected() {
        let s = statement(&[], &[]);
        assert!(HashMixBackend.prove(&s, &witness()).is_err());
    }
}

//! # Fixed-Framing Hash and Commitments
//!
//! `hash_fields` writes every input as exactly one 32-byte big-endian word,
//! concatenates the words, runs SHA-256, and reads the digest back as a
//! field element. The same function opens commitments.
//!
//! ## Security Invariant
//!
//! The framing is fixed-width, so `[a, b]` and `[a || b]` can never collide
//! through re-splitting. Commitments are hiding and binding under the
//! standard SHA-256 assumptions provided the caller mixes in a fresh
//! blinding factor.

use sha2::{Digest, Sha256};

use crate::field::FieldElement;

/// Hash a sequence of field elements with 32-byte-per-input framing.
pub fn hash_fields(inputs: &[FieldElement]) -> FieldElement {
    let mut hasher = Sha256::new();
    for input in inputs {
        hasher.update(input.as_bytes());
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    FieldElement::from_be_bytes(out)
}

/// Commit to a sequence of values.
///
/// Used for ownership commitments (`[ert_id, blind]`) and action
/// commitments (`[ert_id, action_tag, data_hash, timestamp, blind]`). The
/// blinding factor is the caller's responsibility.
pub fn commitment(values: &[FieldElement]) -> FieldElement {
    hash_fields(values)
}

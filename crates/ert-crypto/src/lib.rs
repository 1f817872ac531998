//! # ert-crypto — Cryptographic Primitives
//!
//! Provides the building blocks the proof engine composes:
//!
//! - **Field elements** (`field.rs`): 256-bit big-endian words, address and
//!   integer encodings, two's-complement signed values.
//! - **Hashing** (`hash.rs`): SHA-256 over 32-byte-framed inputs, used both
//!   as a digest and as the commitment opener.
//! - **Blinding** (`blinding.rs`): the injectable CSPRNG source of blinding
//!   factors.
//! - **Merkle allow-lists** (`merkle.rs`): roots, inclusion proofs, and
//!   membership checks over field-encoded address lists.
//!
//! ## Forward Compatibility
//!
//! SHA-256 stands in for an arithmetic-circuit-friendly hash. Any
//! replacement must keep the one-32-byte-word-per-input framing so that
//! commitments and Merkle nodes keep their arity.
//!
//! ## Crate Policy
//!
//! - Depends only on `ert-core` internally.
//! - No mocking of cryptographic operations in tests: all tests use real
//!   SHA-256 and a real (seeded) CSPRNG.
//! - Blinding factors never come from a non-cryptographic RNG.

pub mod blinding;
pub mod field;
pub mod hash;
pub mod merkle;

pub use blinding::{random_field_element, BlindingSource, OsBlindingSource, SeededBlindingSource};
pub use field::{address_to_field, FieldElement};
pub use hash::{commitment, hash_fields};
pub use merkle::{
    build_merkle_root, check_and_prove_inclusion, generate_merkle_proof, prove_membership,
    tree_depth, verify_merkle_proof, AllowListCommitment, InclusionCheck, MerkleProof,
};

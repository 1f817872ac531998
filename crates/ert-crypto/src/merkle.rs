//! # Merkle Allow-List
//!
//! A binary Merkle tree over field-encoded addresses, used to commit to a
//! right's adapter and asset allow-lists so membership can be proven
//! without publishing the list.
//!
//! ## Algorithm
//!
//! - Leaves are the field encodings of the list members, in list order.
//! - The leaf row is right-padded with [`FieldElement::ZERO`] to the next
//!   power of two. An empty list pads to a single zero leaf.
//! - Internal node: `hash_fields([left, right])`.
//!
//! The root is order-sensitive: the same members in a different order
//! produce a different root. Roots are rebuilt from the list for every
//! proof rather than maintained incrementally.
//!
//! ## Path Convention
//!
//! `path[k]` is the sibling at level `k` (leaf level first). `indices[k]`
//! is `true` when the running node is the right child at that level.

use ert_core::{Address, CryptoError, EncodingError};
use serde::{Deserialize, Serialize};

use crate::field::{address_to_field, FieldElement};
use crate::hash::hash_fields;

// ---------------------------------------------------------------------------
// Tree shape
// ---------------------------------------------------------------------------

/// Width of the padded leaf row for `leaf_count` leaves.
fn padded_width(leaf_count: usize) -> usize {
    leaf_count.max(1).next_power_of_two()
}

/// Depth of the padded tree, i.e. the length of every inclusion path.
pub fn tree_depth(leaf_count: usize) -> usize {
    padded_width(leaf_count).trailing_zeros() as usize
}

fn padded_leaves(leaves: &[FieldElement]) -> Vec<FieldElement> {
    let mut level = leaves.to_vec();
    level.resize(padded_width(leaves.len()), FieldElement::ZERO);
    level
}

fn parent_level(level: &[FieldElement]) -> Vec<FieldElement> {
    level
        .chunks(2)
        .map(|pair| hash_fields(&[pair[0], pair[1]]))
        .collect()
}

// ---------------------------------------------------------------------------
// Root, proof generation, proof verification
// ---------------------------------------------------------------------------

/// Compute the root of the padded tree over `leaves`.
pub fn build_merkle_root(leaves: &[FieldElement]) -> FieldElement {
    let mut level = padded_leaves(leaves);
    while level.len() > 1 {
        level = parent_level(&level);
    }
    level[0]
}

/// An inclusion proof for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Position of the leaf in the unpadded list.
    pub leaf_index: usize,
    /// Sibling at each level, leaf level first.
    pub path: Vec<FieldElement>,
    /// `true` where the running node is the right child.
    pub indices: Vec<bool>,
}

impl MerkleProof {
    /// Number of levels the proof climbs.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Build the inclusion proof for `leaves[index]`.
///
/// # Errors
///
/// Returns [`CryptoError::Merkle`] if `index` is outside the unpadded list.
pub fn generate_merkle_proof(
    leaves: &[FieldElement],
    index: usize,
) -> Result<MerkleProof, CryptoError> {
    if index >= leaves.len() {
        return Err(CryptoError::Merkle(format!(
            "leaf index {index} out of range for {} leaves",
            leaves.len()
        )));
    }

    let mut level = padded_leaves(leaves);
    let mut pos = index;
    let mut path = Vec::with_capacity(tree_depth(leaves.len()));
    let mut indices = Vec::with_capacity(path.capacity());

    while level.len() > 1 {
        path.push(level[pos ^ 1]);
        indices.push(pos & 1 == 1);
        level = parent_level(&level);
        pos /= 2;
    }

    Ok(MerkleProof {
        leaf_index: index,
        path,
        indices,
    })
}

/// Refold `leaf` along `path` and compare with `root`.
///
/// Returns `false` rather than an error for malformed input, including
/// `path` and `indices` of different lengths.
pub fn verify_merkle_proof(
    leaf: FieldElement,
    root: FieldElement,
    path: &[FieldElement],
    indices: &[bool],
) -> bool {
    if path.len() != indices.len() {
        return false;
    }
    let computed = path
        .iter()
        .zip(indices)
        .fold(leaf, |cur, (sibling, is_right)| {
            if *is_right {
                hash_fields(&[*sibling, cur])
            } else {
                hash_fields(&[cur, *sibling])
            }
        });
    computed == root
}

// ---------------------------------------------------------------------------
// Allow-list commitment and membership
// ---------------------------------------------------------------------------

/// Commitment to an ordered allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowListCommitment {
    /// Merkle root over the padded list.
    pub root: FieldElement,
    /// Number of real (unpadded) members.
    pub leaf_count: usize,
    /// Depth of the padded tree.
    pub depth: usize,
}

impl AllowListCommitment {
    /// Commit to already-encoded leaves.
    pub fn from_leaves(leaves: &[FieldElement]) -> Self {
        Self {
            root: build_merkle_root(leaves),
            leaf_count: leaves.len(),
            depth: tree_depth(leaves.len()),
        }
    }

    /// Commit to a list of validated addresses.
    pub fn from_addresses(list: &[Address]) -> Self {
        Self::from_leaves(&encode_list(list))
    }

    /// Verify an inclusion proof against this commitment, including the
    /// path-length-equals-depth check.
    pub fn verifies(&self, leaf: FieldElement, proof: &MerkleProof) -> bool {
        proof.depth() == self.depth
            && verify_merkle_proof(leaf, self.root, &proof.path, &proof.indices)
    }
}

/// Outcome of a membership check.
///
/// The root is always present so a verifier can cross-check a negative
/// claim against the published commitment. This type does not prevent a
/// prover from claiming inclusion falsely; that is enforced at
/// verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionCheck {
    /// Whether the candidate is a member.
    pub included: bool,
    /// Inclusion proof, present only when `included`.
    pub proof: Option<MerkleProof>,
    /// Root of the list the candidate was checked against.
    pub root: FieldElement,
}

fn encode_list(list: &[Address]) -> Vec<FieldElement> {
    list.iter().map(FieldElement::from_address).collect()
}

/// Check whether an encoded candidate is in an encoded list and prove it.
///
/// Linear search; the first matching position is proven.
pub fn prove_membership(candidate: FieldElement, leaves: &[FieldElement]) -> InclusionCheck {
    let root = build_merkle_root(leaves);
    let proof = leaves
        .iter()
        .position(|leaf| *leaf == candidate)
        .and_then(|i| generate_merkle_proof(leaves, i).ok());
    InclusionCheck {
        included: proof.is_some(),
        proof,
        root,
    }
}

/// Field-encode `candidate` and `list`, then check and prove membership.
///
/// # Errors
///
/// Returns [`EncodingError::InvalidAddress`] if `candidate` is malformed.
pub fn check_and_prove_inclusion(
    candidate: &str,
    list: &[Address],
) -> Result<InclusionCheck, EncodingError> {
    let candidate = address_to_field(candidate)?;
    Ok(prove_membership(candidate, &encode_list(list)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn leaves(n: u64) -> Vec<FieldElement> {
        (1..=n).map(FieldElement::from_u64).collect()
    }

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn single_leaf_root_is_the_leaf() {
        let l = leaves(1);
        assert_eq!(build_merkle_root(&l), l[0]);
        let proof = generate_merkle_proof(&l, 0).unwrap();
        assert!(proof.path.is_empty());
        assert!(verify_merkle_proof(l[0], l[0], &proof.path, &proof.indices));
    }

    #[test]
    fn empty_list_root_is_zero() {
        assert_eq!(build_merkle_root(&[]), FieldElement::ZERO);
        assert_eq!(tree_depth(0), 0);
    }

    #[test]
    fn two_leaf_root_matches_manual_hash() {
        let l = leaves(2);
        assert_eq!(build_merkle_root(&l), hash_fields(&[l[0], l[1]]));
    }

    #[test]
    fn three_leaves_pad_with_zero() {
        let l = leaves(3);
        let left = hash_fields(&[l[0], l[1]]);
        let right = hash_fields(&[l[2], FieldElement::ZERO]);
        assert_eq!(build_merkle_root(&l), hash_fields(&[left, right]));
        assert_eq!(tree_depth(3), 2);
    }

    #[test]
    fn path_length_equals_padded_depth() {
        for n in [1u64, 2, 3, 4, 5, 8, 9, 17] {
            let l = leaves(n);
            let proof = generate_merkle_proof(&l, 0).unwrap();
            assert_eq!(proof.depth(), tree_depth(l.len()), "n={n}");
        }
    }

    #[test]
    fn root_is_order_sensitive() {
        let mut l = leaves(4);
        let r1 = build_merkle_root(&l);
        l.swap(0, 3);
        assert_ne!(r1, build_merkle_root(&l));
    }

    #[test]
    fn tampered_sibling_fails() {
        let l = leaves(9);
        let root = build_merkle_root(&l);
        let mut proof = generate_merkle_proof(&l, 3).unwrap();
        proof.path[0] = FieldElement::ZERO;
        assert!(!verify_merkle_proof(l[3], root, &proof.path, &proof.indices));
    }

    #[test]
    fn mismatched_path_length_rejected() {
        let l = leaves(4);
        let root = build_merkle_root(&l);
        let proof = generate_merkle_proof(&l, 1).unwrap();
        assert!(!verify_merkle_proof(l[1], root, &proof.path, &proof.indices[..1]));
    }

    #[test]
    fn out_of_range_index_is_error() {
        assert!(generate_merkle_proof(&leaves(5), 5).is_err());
        assert!(generate_merkle_proof(&[], 0).is_err());
    }

    #[test]
    fn commitment_rejects_short_path() {
        let l = leaves(4);
        let c = AllowListCommitment::from_leaves(&l);
        let mut proof = generate_merkle_proof(&l, 2).unwrap();
        assert!(c.verifies(l[2], &proof));
        proof.path.pop();
        proof.indices.pop();
        assert!(!c.verifies(l[2], &proof));
    }

    #[test]
    fn inclusion_of_member_and_non_member() {
        let list = vec![addr("0xa1"), addr("0xa2"), addr("0xa3")];
        let hit = check_and_prove_inclusion("0xA2", &list).unwrap();
        assert!(hit.included);
        let proof = hit.proof.unwrap();
        assert_eq!(proof.leaf_index, 1);
        let leaf = address_to_field("0xa2").unwrap();
        assert!(verify_merkle_proof(leaf, hit.root, &proof.path, &proof.indices));

        let miss = check_and_prove_inclusion("0xb1", &list).unwrap();
        assert!(!miss.included);
        assert!(miss.proof.is_none());
        assert_eq!(miss.root, hit.root);
    }

    #[test]
    fn inclusion_rejects_malformed_candidate() {
        assert!(check_and_prove_inclusion("garbage", &[addr("0x01")]).is_err());
    }

    proptest! {
        #[test]
        fn every_index_verifies(values in proptest::collection::vec(any::<u64>(), 1..40)) {
            let l: Vec<FieldElement> = values.iter().copied().map(FieldElement::from_u64).collect();
            let root = build_merkle_root(&l);
            for i in 0..l.len() {
                let proof = generate_merkle_proof(&l, i).unwrap();
                prop_assert!(verify_merkle_proof(l[i], root, &proof.path, &proof.indices));
            }
        }

        #[test]
        fn membership_matches_list_contents(
            members in proptest::collection::vec(1u64..1000, 1..20),
            candidate in 1u64..1000,
        ) {
            let list: Vec<Address> = members
                .iter()
                .map(|m| Address::parse(&format!("{m:x}")).unwrap())
                .collect();
            for m in &members {
                let hex = format!("0x{m:x}");
                let included = check_and_prove_inclusion(&hex, &list).unwrap().included;
                prop_assert!(included);
            }
            let hex = format!("0x{candidate:x}");
            let included = check_and_prove_inclusion(&hex, &list).unwrap().included;
            prop_assert_eq!(included, members.contains(&candidate));
        }
    }
}

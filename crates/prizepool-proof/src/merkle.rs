//! Sorted-pair Merkle inclusion verification.
//!
//! Tree rule:
//!     parent = SHA256(min(left, right) || max(left, right))
//!
//! The proof is the sequence of sibling hashes from the leaf up to (but not
//! including) the root. Because pairs are sorted before hashing, the verifier
//! needs no position index.

use prizepool_types::{Amount, Identity, MerkleRoot, constants};
use sha2::{Digest, Sha256};

use crate::NodeHash;

/// Domain separator for claim leaves.
pub const CLAIM_LEAF_DOMAIN: &[u8] = b"prizepool:claim_leaf:v1:";

/// Hash one `(claimant, cumulative entitlement)` pair into a leaf.
///
/// The entitlement is the claimant's lifetime total, not a per-claim delta,
/// so a claimant appears in the tree once and can still withdraw in steps.
#[must_use]
pub fn claim_leaf(claimant: Identity, total_entitlement: Amount) -> NodeHash {
    let mut amount_word = [0u8; 32];
    amount_word[16..].copy_from_slice(&total_entitlement.to_be_bytes());

    let mut hasher = Sha256::new();
    hasher.update(CLAIM_LEAF_DOMAIN);
    hasher.update(claimant.as_bytes());
    hasher.update(amount_word);
    hasher.finalize().into()
}

/// Hash two sibling nodes in canonical (sorted) order.
#[must_use]
pub fn hash_pair(a: &NodeHash, b: &NodeHash) -> NodeHash {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update(lo);
    hasher.update(hi);
    hasher.finalize().into()
}

/// Fold a proof onto a leaf, returning the root it implies.
#[must_use]
pub fn process_proof(leaf: &NodeHash, proof: &[NodeHash]) -> NodeHash {
    proof
        .iter()
        .fold(*leaf, |computed, sibling| hash_pair(&computed, sibling))
}

/// Check that `leaf` is included under `root`.
///
/// A zero root or a proof deeper than [`constants::MAX_PROOF_DEPTH`] never
/// verifies.
#[must_use]
pub fn verify_proof(proof: &[NodeHash], root: &MerkleRoot, leaf: &NodeHash) -> bool {
    if root.is_zero() {
        return false;
    }
    if proof.len() > constants::MAX_PROOF_DEPTH {
        tracing::debug!(
            depth = proof.len(),
            max = constants::MAX_PROOF_DEPTH,
            "Inclusion proof rejected: too deep"
        );
        return false;
    }
    process_proof(leaf, proof) == root.0
}

/// Stateless claim verifier used by the registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct MerkleVerifier;

impl MerkleVerifier {
    /// Does `proof` show that `(claimant, total_entitlement)` is committed
    /// under `root`?
    #[must_use]
    pub fn verify_claim(
        root: &MerkleRoot,
        claimant: Identity,
        total_entitlement: Amount,
        proof: &[NodeHash],
    ) -> bool {
        let leaf = claim_leaf(claimant, total_entitlement);
        let ok = verify_proof(proof, root, &leaf);
        if !ok {
            tracing::debug!(
                claimant = %claimant,
                entitlement = total_entitlement,
                leaf = hex::encode(leaf),
                root = %root,
                "Claim proof did not reproduce root"
            );
        }
        ok
    }
}

//! Claim tree builder.
//!
//! Runs off-core (administrator tooling, tests) to turn a winner list into a
//! claim root plus one proof per claimant. Uses exactly the hashing rules of
//! [`crate::merkle`], so every proof it emits verifies on-core.

use std::collections::HashSet;

use prizepool_types::{Amount, Identity, MerkleRoot, PrizePoolError, Result};

use crate::{
    NodeHash,
    merkle::{claim_leaf, hash_pair},
};

/// Binary Merkle tree over claim leaves.
///
/// Leaves are sorted by hash so the same winner set always yields the same
/// root regardless of input order. When a level has an odd node count the
/// last node is carried up unchanged.
#[derive(Debug, Clone)]
pub struct ClaimTree {
    /// All tree levels (sorted leaves at index 0, root at last index).
    levels: Vec<Vec<NodeHash>>,
}

impl ClaimTree {
    /// Build a tree from `(claimant, cumulative entitlement)` pairs.
    ///
    /// A claimant may appear with several totals to stage an entitlement:
    /// each committed total can be claimed, and each claim pays the
    /// difference to what was already withdrawn.
    ///
    /// # Errors
    /// - `InvalidRoot` if `entries` is empty
    /// - `InvalidIdentity` for a null claimant or a repeated pair
    /// - `InvalidAmount` for a zero entitlement
    pub fn build(entries: &[(Identity, Amount)]) -> Result<Self> {
        if entries.is_empty() {
            return Err(PrizePoolError::InvalidRoot {
                reason: "claim tree needs at least one entry".into(),
            });
        }

        let mut seen = HashSet::with_capacity(entries.len());
        let mut leaves = Vec::with_capacity(entries.len());
        for &(claimant, total) in entries {
            if claimant.is_null() {
                return Err(PrizePoolError::InvalidIdentity {
                    reason: "null claimant in claim tree".into(),
                });
            }
            if !seen.insert((claimant, total)) {
                return Err(PrizePoolError::InvalidIdentity {
                    reason: format!("{claimant} committed twice for {total}"),
                });
            }
            if total == 0 {
                return Err(PrizePoolError::InvalidAmount {
                    reason: format!("zero entitlement for {claimant}"),
                });
            }
            leaves.push(claim_leaf(claimant, total));
        }
        leaves.sort_unstable();

        let mut levels = vec![leaves];
        while levels.last().is_some_and(|level| level.len() > 1) {
            let current = &levels[levels.len() - 1];
            let next: Vec<NodeHash> = current
                .chunks(2)
                .filter_map(|pair| {
                    pair.iter()
                        .copied()
                        .reduce(|left, right| hash_pair(&left, &right))
                })
                .collect();
            levels.push(next);
        }

        tracing::debug!(
            leaves = entries.len(),
            depth = levels.len() - 1,
            "Claim tree built"
        );
        Ok(Self { levels })
    }

    /// The claim root to publish.
    #[must_use]
    pub fn root(&self) -> MerkleRoot {
        MerkleRoot(self.levels[self.levels.len() - 1][0])
    }

    /// Number of committed claimants.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Inclusion proof for `(claimant, total_entitlement)`, or `None` if the
    /// pair is not committed.
    #[must_use]
    pub fn proof(&self, claimant: Identity, total_entitlement: Amount) -> Option<Vec<NodeHash>> {
        let leaf = claim_leaf(claimant, total_entitlement);
        let mut index = self.levels[0].binary_search(&leaf).ok()?;

        let mut siblings = Vec::with_capacity(self.levels.len() - 1);
        for level in &self.levels[..self.levels.len() - 1] {
            if let Some(sibling) = level.get(index ^ 1) {
                siblings.push(*sibling);
            }
            index /= 2;
        }
        Some(siblings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MerkleVerifier;

    fn hex32(s: &str) -> NodeHash {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out).unwrap();
        out
    }

    #[test]
    fn two_leaf_root_matches_known_answer() {
        let tree = ClaimTree::build(&[
            (Identity::repeat_byte(0xaa), 150),
            (Identity::repeat_byte(0xbb), 50),
        ])
        .unwrap();
        assert_eq!(
            tree.root().0,
            hex32("ac589cdce17a1400f6de2de667c45fff2f2dba9a7fbe0ef3eb293524b9f1dfa3")
        );
    }

    #[test]
    fn odd_leaf_count_known_answer() {
        let tree = ClaimTree::build(&[
            (Identity::repeat_byte(0xaa), 150),
            (Identity::repeat_byte(0xbb), 50),
            (Identity::repeat_byte(0xcc), 1),
        ])
        .unwrap();
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(
            tree.root().0,
            hex32("560bceaa57a2cb1b34100a98898231d45fe84f02acda39e96dfbdd3c34b00003")
        );
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = (Identity::repeat_byte(1), 10);
        let b = (Identity::repeat_byte(2), 20);
        let c = (Identity::repeat_byte(3), 30);
        let t1 = ClaimTree::build(&[a, b, c]).unwrap();
        let t2 = ClaimTree::build(&[c, a, b]).unwrap();
        assert_eq!(t1.root(), t2.root());
    }

    #[test]
    fn every_proof_verifies() {
        for size in 1..=17usize {
            let entries: Vec<(Identity, Amount)> = (0..size)
                .map(|i| (Identity::random(), (i as Amount + 1) * 25))
                .collect();
            let tree = ClaimTree::build(&entries).unwrap();
            let root = tree.root();
            for &(who, total) in &entries {
                let proof = tree.proof(who, total).expect("committed pair has a proof");
                assert!(
                    MerkleVerifier::verify_claim(&root, who, total, &proof),
                    "size={size} claimant={who}"
                );
            }
        }
    }

    #[test]
    fn proof_for_uncommitted_pair_is_none() {
        let who = Identity::repeat_byte(1);
        let tree = ClaimTree::build(&[(who, 10)]).unwrap();
        assert!(tree.proof(who, 11).is_none());
        assert!(tree.proof(Identity::repeat_byte(2), 10).is_none());
    }

    #[test]
    fn proof_cannot_be_reused_for_other_amount() {
        let a = Identity::repeat_byte(1);
        let b = Identity::repeat_byte(2);
        let tree = ClaimTree::build(&[(a, 10), (b, 20)]).unwrap();
        let proof = tree.proof(a, 10).unwrap();
        assert!(!MerkleVerifier::verify_claim(&tree.root(), a, 20, &proof));
        assert!(!MerkleVerifier::verify_claim(&tree.root(), b, 10, &proof));
    }

    #[test]
    fn staged_entitlements_each_get_a_proof() {
        let a = Identity::repeat_byte(0xaa);
        let b = Identity::repeat_byte(0xbb);
        let tree = ClaimTree::build(&[(a, 100), (a, 150), (b, 50)]).unwrap();
        let root = tree.root();
        for total in [100, 150] {
            let proof = tree.proof(a, total).unwrap();
            assert!(MerkleVerifier::verify_claim(&root, a, total, &proof));
        }
        assert!(tree.proof(a, 120).is_none());
    }

    #[test]
    fn rejects_bad_entries() {
        assert!(matches!(
            ClaimTree::build(&[]),
            Err(PrizePoolError::InvalidRoot { .. })
        ));
        assert!(matches!(
            ClaimTree::build(&[(Identity::NULL, 1)]),
            Err(PrizePoolError::InvalidIdentity { .. })
        ));
        let who = Identity::repeat_byte(5);
        assert!(matches!(
            ClaimTree::build(&[(who, 1), (who, 1)]),
            Err(PrizePoolError::InvalidIdentity { .. })
        ));
        assert!(matches!(
            ClaimTree::build(&[(who, 0)]),
            Err(PrizePoolError::InvalidAmount { .. })
        ));
    }
}

//! # prizepool-proof
//!
//! **Claim commitments for batch-proof competitions.**
//!
//! A published claim root commits to a set of `(claimant, cumulative
//! entitlement)` pairs. This crate owns both sides of that contract:
//!
//! - [`MerkleVerifier`]: stateless inclusion check used by the registry
//! - [`ClaimTree`]: off-core builder that produces the root and per-claimant
//!   proofs the administrator hands out
//!
//! ## Hashing Contract
//!
//! ```text
//! leaf = SHA-256("prizepool:claim_leaf:v1:" || claimant(20) || entitlement(32, big-endian))
//! node = SHA-256(min(a, b) || max(a, b))          // byte-wise lexicographic order
//! ```
//!
//! Sorting each pair before hashing makes proofs order-free: a proof is just
//! the list of sibling hashes from leaf to root, with no left/right flags.
//! Leaf preimages are 76 bytes and node preimages 64 bytes, so a node can
//! never be passed off as a leaf.

pub mod merkle;
pub mod tree;

pub use merkle::{MerkleVerifier, claim_leaf, hash_pair, process_proof, verify_proof};
pub use tree::ClaimTree;

/// A 32-byte node or leaf hash.
pub type NodeHash = [u8; 32];

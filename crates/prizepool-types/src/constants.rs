//! System-wide constants for the PrizePool escrow.

/// The first competition id handed out by a fresh registry.
/// Id `0` is never assigned so indexers can treat it as "unset".
pub const FIRST_COMPETITION_ID: u64 = 1;

/// Byte length of an [`Identity`](crate::Identity) / token address.
pub const IDENTITY_LEN: usize = 20;

/// Byte length of a Merkle root or node hash.
pub const HASH_LEN: usize = 32;

/// Longest inclusion proof accepted by the verifier. A tree this deep
/// already holds more leaves than can ever be committed.
pub const MAX_PROOF_DEPTH: usize = 64;

/// Reentrancy guard is enabled unless the config says otherwise.
pub const DEFAULT_REENTRANCY_GUARD: bool = true;

/// Conservation is verified after every mutating operation by default.
pub const DEFAULT_VERIFY_CONSERVATION: bool = true;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "PrizePool";

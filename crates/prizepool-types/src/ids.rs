//! Identifiers used throughout PrizePool.
//!
//! Competitions are addressed by a monotonically increasing `CompetitionId`.
//! Participants, administrators and token collaborators are 20-byte ledger
//! addresses. Log entries carry a UUIDv7 for time-ordered sorting.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PrizePoolError, constants};

/// Unsigned amount in the settlement asset's base units.
pub type Amount = u128;

// ---------------------------------------------------------------------------
// CompetitionId
// ---------------------------------------------------------------------------

/// Monotonically increasing competition identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CompetitionId(pub u64);

impl CompetitionId {
    /// The id a fresh registry assigns first.
    pub const FIRST: Self = Self(constants::FIRST_COMPETITION_ID);

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for CompetitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "competition:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A 20-byte ledger address: participant, claimant, administrator or the
/// registry's own escrow account.
///
/// The all-zero address is the null identity and is never a valid party.
/// Serializes as a `0x`-prefixed lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(pub [u8; constants::IDENTITY_LEN]);

impl Identity {
    /// The null identity.
    pub const NULL: Self = Self([0u8; constants::IDENTITY_LEN]);

    /// An identity whose bytes are all `byte`. Handy for fixtures.
    #[must_use]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; constants::IDENTITY_LEN])
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; constants::IDENTITY_LEN] {
        &self.0
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; constants::IDENTITY_LEN]
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Identity {
    type Err = PrizePoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; constants::IDENTITY_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| {
            PrizePoolError::InvalidIdentity {
                reason: format!("cannot parse {s:?}: {e}"),
            }
        })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Identity {
    type Error = PrizePoolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.to_string()
    }
}

/// Random identity for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Identity {
    /// A random non-null identity.
    pub fn random() -> Self {
        loop {
            let candidate = Self(rand::random());
            if !candidate.is_null() {
                return candidate;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TokenAddress
// ---------------------------------------------------------------------------

/// Address of a fungible-token collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TokenAddress(pub Identity);

impl TokenAddress {
    #[must_use]
    pub const fn new(address: Identity) -> Self {
        Self(address)
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// MerkleRoot
// ---------------------------------------------------------------------------

/// A 32-byte commitment over the (identity, cumulative entitlement) pairs of
/// a batch-proof competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MerkleRoot(pub [u8; constants::HASH_LEN]);

impl MerkleRoot {
    /// The zero root. Never accepted as a commitment.
    pub const ZERO: Self = Self([0u8; constants::HASH_LEN]);

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; constants::HASH_LEN] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; constants::HASH_LEN]
    }
}

impl From<[u8; constants::HASH_LEN]> for MerkleRoot {
    fn from(bytes: [u8; constants::HASH_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for MerkleRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// EventId
// ---------------------------------------------------------------------------

/// Unique identifier for a log entry. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evt:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn competition_id_next() {
        assert_eq!(CompetitionId(5).next(), CompetitionId(6));
        assert_eq!(CompetitionId::FIRST, CompetitionId(1));
    }

    #[test]
    fn null_identity() {
        assert!(Identity::NULL.is_null());
        assert!(!Identity::repeat_byte(1).is_null());
        assert!(!Identity::random().is_null());
    }

    #[test]
    fn identity_display_and_parse() {
        let id = Identity::repeat_byte(0xab);
        let text = id.to_string();
        assert_eq!(text, format!("0x{}", "ab".repeat(20)));
        assert_eq!(text.parse::<Identity>().unwrap(), id);
        // Prefix is optional.
        assert_eq!("ab".repeat(20).parse::<Identity>().unwrap(), id);
    }

    #[test]
    fn identity_parse_rejects_wrong_length() {
        let err = "0x1234".parse::<Identity>().unwrap_err();
        assert!(matches!(err, PrizePoolError::InvalidIdentity { .. }));
        assert!("zz".repeat(20).parse::<Identity>().is_err());
    }

    #[test]
    fn identity_serializes_as_hex() {
        let id = Identity::repeat_byte(0x01);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(20)));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn merkle_root_zero() {
        assert!(MerkleRoot::ZERO.is_zero());
        assert!(!MerkleRoot([7u8; 32]).is_zero());
    }

    #[test]
    fn event_id_ordering() {
        let a = EventId::new();
        let b = EventId::new();
        assert_ne!(a, b);
        assert!(a < b);
    }
}

//! # Competition: the escrow entity
//!
//! One `Competition` exists per created id. Everything but the status, the
//! escrow account and the one-shot settlement fields is fixed at creation.
//!
//! ## State Machine
//!
//! ```text
//!   ┌────────┐  set_winner / publish_claim_root  ┌───────────┐
//!   │ ACTIVE ├──────────────────────────────────▶│ COMPLETED │
//!   └────────┘                                   └───────────┘
//! ```
//!
//! The transition is one-directional and happens at most once. A completed
//! batch-proof competition keeps paying claims out of its pool; a completed
//! single-winner competition has an empty pool.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Amount, CompetitionId, EscrowAccount, Identity, MerkleRoot, PrizePoolError, Result,
    TokenAddress,
};

/// How the pool of a competition is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitionMode {
    /// The administrator names one participant who receives the whole pool.
    SingleWinner,
    /// The administrator publishes a Merkle root; winners claim independently.
    BatchProof,
}

impl fmt::Display for CompetitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleWinner => write!(f, "SINGLE_WINNER"),
            Self::BatchProof => write!(f, "BATCH_PROOF"),
        }
    }
}

/// Lifecycle status of a competition.
///
/// Transitions are **monotonic**: `Active → Completed` and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitionStatus {
    /// Accepting entries.
    Active,
    /// Finalized. Irreversible.
    Completed,
}

impl CompetitionStatus {
    /// Can a competition move from this status to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Active, Self::Completed))
    }
}

impl fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// The rail entry fees are collected on and prizes are paid out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementAsset {
    /// The host ledger's native currency.
    Native,
    /// A fungible-token collaborator.
    Token(TokenAddress),
}

impl SettlementAsset {
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

impl fmt::Display for SettlementAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "NATIVE"),
            Self::Token(token) => write!(f, "{token}"),
        }
    }
}

/// A competition: entry-fee collection plus prize settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    /// Registry-assigned id.
    pub id: CompetitionId,
    /// Settlement mode. Immutable.
    pub mode: CompetitionMode,
    /// Lifecycle status.
    pub status: CompetitionStatus,
    /// Rail used for entries and payouts. Immutable.
    pub settlement_asset: SettlementAsset,
    /// Exact amount required to join. Immutable.
    pub entry_fee: Amount,
    /// Escrowed value plus lifetime deposit / payout counters.
    pub escrow: EscrowAccount,
    /// The administrator that created this competition.
    pub administrator: Identity,
    /// Host timestamp at creation.
    pub created_at: DateTime<Utc>,
    /// Set once at finalization, single-winner mode only.
    pub single_winner: Option<Identity>,
    /// Set once at finalization, batch-proof mode only.
    pub claim_root: Option<MerkleRoot>,
    /// Number of entries taken.
    pub participant_count: u64,
}

impl Competition {
    /// A fresh competition in `Active` status with an empty pool.
    #[must_use]
    pub fn new(
        id: CompetitionId,
        mode: CompetitionMode,
        settlement_asset: SettlementAsset,
        entry_fee: Amount,
        administrator: Identity,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            mode,
            status: CompetitionStatus::Active,
            settlement_asset,
            entry_fee,
            escrow: EscrowAccount::new(),
            administrator,
            created_at,
            single_winner: None,
            claim_root: None,
            participant_count: 0,
        }
    }

    /// Currently escrowed amount.
    #[must_use]
    pub fn pooled_balance(&self) -> Amount {
        self.escrow.pooled
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == CompetitionStatus::Active
    }

    /// Fail with `InvalidMode` unless the competition runs in `expected` mode.
    pub fn ensure_mode(&self, expected: CompetitionMode) -> Result<()> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(PrizePoolError::InvalidMode {
                competition: self.id,
                expected,
                actual: self.mode,
            })
        }
    }

    /// Fail with `InvalidState` unless the competition is in `expected` status.
    pub fn ensure_status(&self, expected: CompetitionStatus) -> Result<()> {
        if self.status == expected {
            Ok(())
        } else {
            Err(PrizePoolError::InvalidState {
                competition: self.id,
                expected,
                actual: self.status,
            })
        }
    }

    /// Move to `Completed`.
    ///
    /// # Errors
    /// Returns `InvalidState` if the competition is already completed.
    pub fn mark_completed(&mut self) -> Result<()> {
        if !self.status.can_transition_to(CompetitionStatus::Completed) {
            return Err(PrizePoolError::InvalidState {
                competition: self.id,
                expected: CompetitionStatus::Active,
                actual: self.status,
            });
        }
        self.status = CompetitionStatus::Completed;
        Ok(())
    }
}

/// Dummy competition for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Competition {
    /// An active competition with a fixed administrator and the current time.
    pub fn dummy(mode: CompetitionMode, settlement_asset: SettlementAsset, entry_fee: Amount) -> Self {
        Self::new(
            CompetitionId::FIRST,
            mode,
            settlement_asset,
            entry_fee,
            Identity::repeat_byte(0xad),
            Utc::now(),
        )
    }
}

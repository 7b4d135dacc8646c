//! Append-only log entries emitted by the registry.
//!
//! Every state transition produces exactly one [`LedgerEvent`]. External
//! indexers rebuild participant lists, winners and claim histories from this
//! log; the core never reads it back.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Amount, CompetitionId, CompetitionMode, EventId, Identity, MerkleRoot, SettlementAsset,
};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A competition was created.
    CompetitionCreated {
        mode: CompetitionMode,
        settlement_asset: SettlementAsset,
        entry_fee: Amount,
        administrator: Identity,
    },
    /// An entry fee was escrowed for `participant`, paid by `payer`.
    EntryJoined {
        participant: Identity,
        payer: Identity,
        amount: Amount,
    },
    /// The whole pool was paid to the single winner.
    WinnerSettled { winner: Identity, amount: Amount },
    /// A claim root was published; claims are open.
    ClaimRootPublished { root: MerkleRoot },
    /// A claimant withdrew `amount`, bringing their total to `total_claimed`.
    PrizeClaimed {
        claimant: Identity,
        amount: Amount,
        total_claimed: Amount,
    },
    /// The administrator capability moved to a new identity.
    AdministrationTransferred { previous: Identity, current: Identity },
}

impl EventKind {
    /// Short upper-case name, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CompetitionCreated { .. } => "COMPETITION_CREATED",
            Self::EntryJoined { .. } => "ENTRY_JOINED",
            Self::WinnerSettled { .. } => "WINNER_SETTLED",
            Self::ClaimRootPublished { .. } => "CLAIM_ROOT_PUBLISHED",
            Self::PrizeClaimed { .. } => "PRIZE_CLAIMED",
            Self::AdministrationTransferred { .. } => "ADMINISTRATION_TRANSFERRED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Unique id.
    pub id: EventId,
    /// Position in the log, starting at 0, gap-free.
    pub sequence: u64,
    /// The competition this event belongs to. `None` for registry-wide events.
    pub competition: Option<CompetitionId>,
    /// Payload.
    pub kind: EventKind,
    /// Host timestamp at emission.
    pub recorded_at: DateTime<Utc>,
}

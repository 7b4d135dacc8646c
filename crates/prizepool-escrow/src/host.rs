//! The host execution environment, seen from the escrow core.
//!
//! The host owns the actual value: native currency balances and the token
//! collaborators. It also supplies the timestamp recorded on competitions
//! and log entries.
//!
//! Transfers are synchronous. Each one hands the host a `reentry` handle so a
//! recipient (or a hostile token) can call back into the registry before the
//! transfer returns. The registry must already have committed its own state
//! when it issues a transfer.

use std::fmt;

use chrono::{DateTime, Utc};
use prizepool_types::{Amount, Identity, PrizePoolError, Result, TokenAddress};

/// Result of a single host transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Value moved.
    Completed,
    /// The callee returned a failure indicator. Nothing moved.
    Rejected,
    /// The callee aborted. Nothing moved.
    Aborted { reason: String },
}

impl TransferOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Map anything but `Completed` to `TransferFailure`, tagged with `what`.
    pub fn into_result(self, what: impl fmt::Display) -> Result<()> {
        match self {
            Self::Completed => Ok(()),
            Self::Rejected => Err(PrizePoolError::TransferFailure {
                reason: format!("{what}: rejected by callee"),
            }),
            Self::Aborted { reason } => Err(PrizePoolError::TransferFailure {
                reason: format!("{what}: aborted: {reason}"),
            }),
        }
    }
}

/// Collaborators supplied by the execution environment.
///
/// `R` is the type a reentrant recipient calls back into (the registry).
pub trait Host<R: ?Sized> {
    /// Current timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Send native currency from the escrow account to `to`.
    fn send_native(&mut self, reentry: &mut R, to: Identity, amount: Amount) -> TransferOutcome;

    /// `token.transfer(to, amount)` issued by the escrow account.
    fn token_transfer(
        &mut self,
        reentry: &mut R,
        token: TokenAddress,
        to: Identity,
        amount: Amount,
    ) -> TransferOutcome;

    /// `token.transferFrom(from, to, amount)` issued by the escrow account.
    /// Requires `from` to have approved the escrow account beforehand.
    fn token_transfer_from(
        &mut self,
        reentry: &mut R,
        token: TokenAddress,
        from: Identity,
        to: Identity,
        amount: Amount,
    ) -> TransferOutcome;
}

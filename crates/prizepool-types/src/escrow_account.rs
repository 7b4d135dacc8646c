//! Per-competition escrow accounting.
//!
//! Every competition owns one `EscrowAccount`. Besides the pooled balance it
//! keeps lifetime totals so the conservation invariant can be checked at any
//! time:
//!
//! ```text
//! pooled == deposited - paid_out      (and therefore paid_out <= deposited)
//! ```
//!
//! All mutations are atomic: either the full update succeeds or the account
//! is unchanged.

use serde::{Deserialize, Serialize};

use crate::{Amount, CompetitionId, PrizePoolError, Result};

/// Escrowed value of a single competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EscrowAccount {
    /// Value currently held and available for payout.
    pub pooled: Amount,
    /// Lifetime entry fees collected.
    pub deposited: Amount,
    /// Lifetime value released to winners / claimants.
    pub paid_out: Amount,
}

impl EscrowAccount {
    /// An empty account.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collected entry fee.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if either total would overflow.
    pub fn credit(&mut self, amount: Amount) -> Result<()> {
        let pooled = self
            .pooled
            .checked_add(amount)
            .ok_or(PrizePoolError::ArithmeticOverflow { context: "escrow pool" })?;
        let deposited = self
            .deposited
            .checked_add(amount)
            .ok_or(PrizePoolError::ArithmeticOverflow { context: "escrow deposits" })?;
        self.pooled = pooled;
        self.deposited = deposited;
        Ok(())
    }

    /// Release `amount` from the pool.
    ///
    /// # Errors
    /// Returns `InsufficientPool` if `amount` exceeds the pooled balance.
    pub fn debit(&mut self, amount: Amount) -> Result<()> {
        if amount > self.pooled {
            return Err(PrizePoolError::InsufficientPool {
                needed: amount,
                available: self.pooled,
            });
        }
        let paid_out = self
            .paid_out
            .checked_add(amount)
            .ok_or(PrizePoolError::ArithmeticOverflow { context: "escrow payouts" })?;
        self.pooled -= amount;
        self.paid_out = paid_out;
        Ok(())
    }

    /// Release the whole pool, returning what it held.
    pub fn drain(&mut self) -> Result<Amount> {
        let amount = self.pooled;
        self.debit(amount)?;
        Ok(amount)
    }

    /// Verify `pooled == deposited - paid_out`.
    ///
    /// # Errors
    /// Returns [`PrizePoolError::ConservationViolation`] if the totals disagree.
    pub fn verify(&self, competition: CompetitionId) -> Result<()> {
        match self.deposited.checked_sub(self.paid_out) {
            Some(expected) if expected == self.pooled => Ok(()),
            _ => Err(PrizePoolError::ConservationViolation {
                reason: format!(
                    "{competition}: pooled {} != deposited {} - paid_out {}",
                    self.pooled, self.deposited, self.paid_out
                ),
            }),
        }
    }
}

//! Claim ledger: cumulative amount each claimant has withdrawn.
//!
//! Entitlements committed in a claim root are lifetime totals. A claim pays
//! the difference between the proven total and what was already withdrawn,
//! so the recorded amount only ever grows and never passes the entitlement.

use std::collections::HashMap;

use prizepool_types::{Amount, CompetitionId, Identity, PrizePoolError, Result};

/// Per-(competition, claimant) withdrawn totals, with a running sum per
/// competition.
#[derive(Debug, Default, Clone)]
pub struct ClaimLedger {
    claimed: HashMap<(CompetitionId, Identity), Amount>,
    totals: HashMap<CompetitionId, Amount>,
}

impl ClaimLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount `claimant` has withdrawn from `competition`. Zero if never.
    #[must_use]
    pub fn claimed(&self, competition: CompetitionId, claimant: Identity) -> Amount {
        self.claimed
            .get(&(competition, claimant))
            .copied()
            .unwrap_or(0)
    }

    /// What a claim against `total_entitlement` would pay right now.
    ///
    /// # Errors
    /// Returns [`PrizePoolError::AlreadyClaimed`] if nothing is left.
    pub fn delta_for(
        &self,
        competition: CompetitionId,
        claimant: Identity,
        total_entitlement: Amount,
    ) -> Result<Amount> {
        let claimed = self.claimed(competition, claimant);
        if claimed >= total_entitlement {
            return Err(PrizePoolError::AlreadyClaimed {
                claimed,
                entitlement: total_entitlement,
            });
        }
        Ok(total_entitlement - claimed)
    }

    /// Raise the withdrawn total for `claimant` to `total_entitlement`.
    /// Returns the previous total so the caller can unwind.
    ///
    /// # Errors
    /// Returns [`PrizePoolError::AlreadyClaimed`] if the new total would not
    /// exceed the recorded one.
    pub fn record(
        &mut self,
        competition: CompetitionId,
        claimant: Identity,
        total_entitlement: Amount,
    ) -> Result<Amount> {
        let previous = self.claimed(competition, claimant);
        if total_entitlement <= previous {
            return Err(PrizePoolError::AlreadyClaimed {
                claimed: previous,
                entitlement: total_entitlement,
            });
        }
        self.claimed
            .insert((competition, claimant), total_entitlement);
        let total = self.totals.entry(competition).or_insert(0);
        *total = total.saturating_add(total_entitlement - previous);
        Ok(previous)
    }

    /// Restore a claimant's total to `previous`. Rollback only.
    pub fn unwind(&mut self, competition: CompetitionId, claimant: Identity, previous: Amount) {
        let current = self.claimed(competition, claimant);
        let total = self.totals.entry(competition).or_insert(0);
        *total = total.saturating_sub(current).saturating_add(previous);
        if *total == 0 {
            self.totals.remove(&competition);
        }
        if previous == 0 {
            self.claimed.remove(&(competition, claimant));
        } else {
            self.claimed.insert((competition, claimant), previous);
        }
    }

    /// Sum withdrawn from `competition` across all claimants.
    #[must_use]
    pub fn total_claimed(&self, competition: CompetitionId) -> Amount {
        self.totals.get(&competition).copied().unwrap_or(0)
    }
}

//! Per-competition reentrancy lock.
//!
//! Held for the duration of every outbound transfer (and the token pull in
//! `join`). While held, any mutating call scoped to the same competition is
//! rejected with [`PrizePoolError::ReentrantCall`]. Calls on other
//! competitions proceed.

use std::collections::HashSet;

use prizepool_types::{CompetitionId, PrizePoolError, Result};

/// Set of competitions with a transfer in flight.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    enabled: bool,
    in_flight: HashSet<CompetitionId>,
}

impl ReentrancyGuard {
    /// A guard that is active only if `enabled`. A disabled guard never
    /// rejects, leaving ordering alone to stop reentrant calls.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            in_flight: HashSet::new(),
        }
    }

    #[must_use]
    pub fn is_held(&self, competition: CompetitionId) -> bool {
        self.in_flight.contains(&competition)
    }

    /// Gate at the entry of a mutating call.
    ///
    /// # Errors
    /// Returns [`PrizePoolError::ReentrantCall`] if a transfer for
    /// `competition` is in flight.
    pub fn check(&self, competition: CompetitionId) -> Result<()> {
        if self.is_held(competition) {
            tracing::warn!(competition = %competition, "Reentrant call rejected");
            return Err(PrizePoolError::ReentrantCall(competition));
        }
        Ok(())
    }

    pub fn enter(&mut self, competition: CompetitionId) {
        if self.enabled {
            self.in_flight.insert(competition);
        }
    }

    pub fn exit(&mut self, competition: CompetitionId) {
        self.in_flight.remove(&competition);
    }
}

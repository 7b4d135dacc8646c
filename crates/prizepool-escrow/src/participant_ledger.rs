//! Participant ledger: who has paid into which competition.
//!
//! Like a spent-output set: an identity can enter a competition at most once.
//! A second enrollment returns [`PrizePoolError::AlreadyJoined`].

use std::collections::{HashMap, HashSet};

use prizepool_types::{CompetitionId, Identity, PrizePoolError, Result};

#[derive(Debug, Default, Clone)]
struct Roster {
    members: HashSet<Identity>,
    /// Join order, for enumeration.
    order: Vec<Identity>,
}

/// Per-competition set of identities that joined.
#[derive(Debug, Default, Clone)]
pub struct ParticipantLedger {
    rosters: HashMap<CompetitionId, Roster>,
}

impl ParticipantLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `identity` joined `competition`.
    ///
    /// # Errors
    /// Returns [`PrizePoolError::AlreadyJoined`] if the identity is already
    /// enrolled.
    pub fn enroll(&mut self, competition: CompetitionId, identity: Identity) -> Result<()> {
        let roster = self.rosters.entry(competition).or_default();
        if !roster.members.insert(identity) {
            return Err(PrizePoolError::AlreadyJoined {
                competition,
                identity,
            });
        }
        roster.order.push(identity);
        Ok(())
    }

    /// Membership test. Unknown competitions have no participants.
    #[must_use]
    pub fn has_joined(&self, competition: CompetitionId, identity: Identity) -> bool {
        self.rosters
            .get(&competition)
            .is_some_and(|roster| roster.members.contains(&identity))
    }

    #[must_use]
    pub fn count(&self, competition: CompetitionId) -> usize {
        self.rosters
            .get(&competition)
            .map_or(0, |roster| roster.order.len())
    }

    /// Participants of `competition` in join order.
    #[must_use]
    pub fn participants(&self, competition: CompetitionId) -> &[Identity] {
        self.rosters
            .get(&competition)
            .map_or(&[], |roster| roster.order.as_slice())
    }

    /// Undo the most recent enrollment of `identity`. Used only by rollback,
    /// which unwinds in reverse order, so the identity is the last in line.
    pub fn unwind(&mut self, competition: CompetitionId, identity: Identity) {
        let Some(roster) = self.rosters.get_mut(&competition) else {
            return;
        };
        if roster.members.remove(&identity) {
            if let Some(pos) = roster.order.iter().rposition(|who| *who == identity) {
                roster.order.remove(pos);
            }
        }
        if roster.order.is_empty() {
            self.rosters.remove(&competition);
        }
    }
}

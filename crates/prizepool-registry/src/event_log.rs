//! Append-only event log.
//!
//! Sequence numbers are gap-free from 0. The only removal is `pop`, used by
//! rollback to discard entries of an operation that did not complete.

use chrono::{DateTime, Utc};
use prizepool_types::{CompetitionId, EventId, EventKind, LedgerEvent};

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<LedgerEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and return it.
    pub fn append(
        &mut self,
        competition: Option<CompetitionId>,
        kind: EventKind,
        recorded_at: DateTime<Utc>,
    ) -> &LedgerEvent {
        let sequence = u64::try_from(self.entries.len()).unwrap_or(u64::MAX);
        tracing::debug!(sequence = sequence, event = %kind, "Event appended");
        self.entries.push(LedgerEvent {
            id: EventId::new(),
            sequence,
            competition,
            kind,
            recorded_at,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Remove the newest entry.
    pub fn pop(&mut self) -> Option<LedgerEvent> {
        self.entries.pop()
    }

    #[must_use]
    pub fn all(&self) -> &[LedgerEvent] {
        &self.entries
    }

    /// Entries belonging to `competition`, oldest first.
    pub fn for_competition(
        &self,
        competition: CompetitionId,
    ) -> impl Iterator<Item = &LedgerEvent> + '_ {
        self.entries
            .iter()
            .filter(move |event| event.competition == Some(competition))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Undo journal for all-or-nothing operations.
//!
//! Every registry mutation pushes the entry needed to reverse it. A public
//! operation opens a frame with [`Journal::begin`]; on success it calls
//! [`Journal::commit`], on failure [`Journal::rollback`] hands back the
//! entries recorded since the frame opened, newest first.
//!
//! Frames nest. A reentrant call made during a transfer opens an inner frame:
//! when it fails only its own entries unwind; when it succeeds its entries
//! stay in the outer frame, so an outer failure unwinds them too. The journal
//! is cleared once the outermost frame commits.

use prizepool_types::{Amount, Competition, CompetitionId, Identity};

/// One reversible mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    /// A competition was appended to the arena.
    Created(CompetitionId),
    /// A competition was modified; holds its prior value.
    Competition(Box<Competition>),
    /// `identity` was enrolled in `competition`.
    Enrolled {
        competition: CompetitionId,
        identity: Identity,
    },
    /// `claimant`'s withdrawn total was raised from `previous`.
    Claimed {
        competition: CompetitionId,
        claimant: Identity,
        previous: Amount,
    },
    /// An event was appended to the log.
    Logged,
    /// The administrator capability moved away from `previous`.
    AdminChanged { previous: Identity },
}

/// Position in the journal at which a frame opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

#[derive(Debug, Default)]
pub struct Journal {
    entries: Vec<JournalEntry>,
    depth: usize,
}

impl Journal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a frame.
    pub fn begin(&mut self) -> Mark {
        self.depth += 1;
        Mark(self.entries.len())
    }

    pub fn record(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    /// Close the current frame, keeping its effects.
    pub fn commit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.entries.clear();
        }
    }

    /// Close the current frame and return its entries, newest first.
    pub fn rollback(&mut self, mark: Mark) -> Vec<JournalEntry> {
        self.depth = self.depth.saturating_sub(1);
        let mut undone = self.entries.split_off(mark.0.min(self.entries.len()));
        undone.reverse();
        if self.depth == 0 {
            self.entries.clear();
        }
        undone
    }

    /// Entries held by open frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of open frames.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrolled(byte: u8) -> JournalEntry {
        JournalEntry::Enrolled {
            competition: CompetitionId(1),
            identity: Identity::repeat_byte(byte),
        }
    }

    #[test]
    fn outermost_commit_clears() {
        let mut journal = Journal::new();
        journal.begin();
        journal.record(enrolled(1));
        journal.commit();
        assert!(journal.is_empty());
        assert_eq!(journal.depth(), 0);
    }

    #[test]
    fn rollback_returns_newest_first() {
        let mut journal = Journal::new();
        let mark = journal.begin();
        journal.record(enrolled(1));
        journal.record(JournalEntry::Logged);
        let undone = journal.rollback(mark);
        assert_eq!(undone, vec![JournalEntry::Logged, enrolled(1)]);
        assert!(journal.is_empty());
    }

    #[test]
    fn inner_rollback_keeps_outer_entries() {
        let mut journal = Journal::new();
        let outer = journal.begin();
        journal.record(enrolled(1));

        let inner = journal.begin();
        journal.record(enrolled(2));
        assert_eq!(journal.rollback(inner), vec![enrolled(2)]);
        assert_eq!(journal.len(), 1);

        assert_eq!(journal.rollback(outer), vec![enrolled(1)]);
    }

    #[test]
    fn committed_inner_frame_unwinds_with_outer() {
        let mut journal = Journal::new();
        let outer = journal.begin();
        journal.record(enrolled(1));

        journal.begin();
        journal.record(enrolled(2));
        journal.commit();
        assert_eq!(journal.len(), 2);

        assert_eq!(journal.rollback(outer), vec![enrolled(2), enrolled(1)]);
        assert_eq!(journal.depth(), 0);
    }
}

use serde::Serialize;

use crate::surface::{Direction, StepKind};

/// A processed step event, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    pub seq: u64,
    pub kind: StepKind,
    pub chapter: String,
    pub direction: Direction,
}

/// Append-only record of the step events the synchronizer handled.
#[derive(Debug, Default)]
pub struct Journal {
    next_seq: u64,
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: StepKind, chapter: impl Into<String>, direction: Direction) {
        self.entries.push(JournalEntry {
            seq: self.next_seq,
            kind,
            chapter: chapter.into(),
            direction,
        });
        self.next_seq += 1;
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Takes the recorded entries; sequence numbers keep counting.
    pub fn drain(&mut self) -> Vec<JournalEntry> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::Journal;
    use crate::surface::{Direction, StepKind};

    #[test]
    fn records_in_order_with_sequence() {
        let mut journal = Journal::new();
        journal.record(StepKind::Enter, "a", Direction::Down);
        journal.record(StepKind::Exit, "a", Direction::Down);
        let seqs: Vec<_> = journal.entries().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert_eq!(journal.entries()[1].kind, StepKind::Exit);
    }

    #[test]
    fn drain_clears_but_keeps_counting() {
        let mut journal = Journal::new();
        journal.record(StepKind::Enter, "a", Direction::Down);
        assert_eq!(journal.drain().len(), 1);
        assert!(journal.entries().is_empty());
        journal.record(StepKind::Enter, "b", Direction::Down);
        assert_eq!(journal.entries()[0].seq, 1);
    }
}

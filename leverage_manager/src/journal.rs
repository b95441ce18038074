use std::collections::VecDeque;

use candid::CandidType;
use serde::Deserialize;

use crate::{constants::JOURNAL_CAPACITY, utils::error::ManagerResult};

/// Category of a journal entry
#[derive(Clone, Copy, CandidType, Debug, Deserialize, PartialEq, Eq)]
pub enum LogType {
    Info,
    Leverage,
    Deleverage,
    Rebalance,
    Harvest,
    FeeCharge,
    Deposit,
    Withdrawal,
    Lifecycle,
    /// Outcome of a whole entry point, committed or rolled back
    ExecutionResult,
}

/// Journal entry
#[derive(Clone, CandidType, Debug, Deserialize)]
pub struct JournalEntry {
    /// Monotonic sequence number of the entry
    pub id: u64,
    /// Wall-clock time in milliseconds
    pub timestamp: u64,
    pub entry: ManagerResult<()>,
    pub log_type: LogType,
    pub note: Option<String>,
}

/// Bounded in-memory journal of a strategy
#[derive(Clone, Debug)]
pub struct JournalCollection {
    entries: VecDeque<JournalEntry>,
    next_id: u64,
    capacity: usize,
}

impl Default for JournalCollection {
    fn default() -> Self {
        Self::with_capacity(JOURNAL_CAPACITY)
    }
}

impl JournalCollection {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(JOURNAL_CAPACITY)),
            next_id: 0,
            capacity,
        }
    }

    /// Appends a note, pruning the oldest entry once the capacity is reached
    pub fn append_note<S: AsRef<str>>(
        &mut self,
        entry: ManagerResult<()>,
        log_type: LogType,
        note: S,
    ) -> &mut Self {
        if self.capacity == 0 {
            return self;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(JournalEntry {
            id: self.next_id,
            timestamp: chrono::Utc::now().timestamp_millis().max(0) as u64,
            entry,
            log_type,
            note: Some(note.as_ref().to_string()),
        });
        self.next_id += 1;
        self
    }

    /// Marker to pass to [`JournalCollection::discard_since`]
    pub fn mark(&self) -> u64 {
        self.next_id
    }

    /// Drops every entry appended after `mark` was taken
    pub fn discard_since(&mut self, mark: u64) {
        while self.entries.back().is_some_and(|entry| entry.id >= mark) {
            self.entries.pop_back();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ManagerError;

    #[test]
    fn test_append_note() {
        let mut journal = JournalCollection::default();
        journal
            .append_note(Ok(()), LogType::Info, "first")
            .append_note(Err(ManagerError::Locked), LogType::ExecutionResult, "second");

        let entries: Vec<&JournalEntry> = journal.entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 0);
        assert_eq!(entries[0].note.as_deref(), Some("first"));
        assert_eq!(entries[1].entry, Err(ManagerError::Locked));
        assert_eq!(entries[1].log_type, LogType::ExecutionResult);
    }

    #[test]
    fn test_capacity_prunes_oldest() {
        let mut journal = JournalCollection::with_capacity(3);
        for i in 0..5 {
            journal.append_note(Ok(()), LogType::Info, format!("note {}", i));
        }

        let ids: Vec<u64> = journal.entries().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_discard_since_survives_pruning() {
        let mut journal = JournalCollection::with_capacity(2);
        journal.append_note(Ok(()), LogType::Info, "kept");
        let mark = journal.mark();
        journal
            .append_note(Ok(()), LogType::Leverage, "dropped")
            .append_note(Ok(()), LogType::Leverage, "dropped too");
        journal.discard_since(mark);

        assert!(journal.is_empty());

        journal.append_note(Ok(()), LogType::Info, "after");
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.entries().next().map(|entry| entry.id), Some(3));
    }
}

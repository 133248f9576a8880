//! Bounded journal of attempted edits.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::edit::{EditKind, EditReport, EditStatus};
use crate::ids::BlockId;

/// Default number of journal rows kept by a store.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 256;

/// Journal result for one attempted edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EditJournalResult {
    Applied,
    Skipped { reason: String },
}

/// One journal row, in the order edits were attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditJournalEntry {
    pub sequence: u64,
    pub operation_id: u64,
    pub kind: EditKind,
    pub touched: Vec<BlockId>,
    pub before_hash: u64,
    pub after_hash: u64,
    pub result: EditJournalResult,
}

/// Ring buffer of the most recent edit attempts, applied and skipped alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditJournal {
    capacity: usize,
    sequence: u64,
    entries: VecDeque<EditJournalEntry>,
}

impl Default for EditJournal {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_JOURNAL_CAPACITY)
    }
}

impl EditJournal {
    /// A capacity of 0 disables recording.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            sequence: 0,
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_JOURNAL_CAPACITY)),
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &EditJournalEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&EditJournalEntry> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn record(&mut self, report: &EditReport) {
        self.sequence = self.sequence.saturating_add(1);
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            let _ = self.entries.pop_front();
        }
        let result = match &report.status {
            EditStatus::Applied => EditJournalResult::Applied,
            EditStatus::Skipped(reason) => EditJournalResult::Skipped {
                reason: reason.to_string(),
            },
        };
        self.entries.push_back(EditJournalEntry {
            sequence: self.sequence,
            operation_id: report.operation_id,
            kind: report.kind,
            touched: report.touched.clone(),
            before_hash: report.before_hash,
            after_hash: report.after_hash,
            result,
        });
    }
}

//! Bounded search history.
//!
//! The history is the backbone of the client: the active record, the
//! comparison picks, and the recent-searches rail all come from here. It
//! stays small on purpose, ten entries, most recent first, keyed
//! case-insensitively by model name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use contract::CarFacts;

/// Most entries a profile retains. Inserting past this evicts the oldest.
pub const HISTORY_CAP: usize = 10;

/// One remembered search: the merged facts plus when and in which language
/// they were fetched. Identity is the case-insensitive model name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub model_name: String,
    pub facts: CarFacts,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub captured_at: DateTime<Utc>,
    pub language: String,
}

/// Most-recent-first bounded list of past searches.
///
/// Serializes as a bare array, the same shape a browser profile would keep
/// in local storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory {
    entries: Vec<HistoryEntry>,
}

fn same_model(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl SearchHistory {
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, model_name: &str) -> Option<&HistoryEntry> {
        self.entries
            .iter()
            .find(|entry| same_model(&entry.model_name, model_name))
    }

    /// Inserts or refreshes an entry. A repeat model replaces its previous
    /// entry and moves to the front; the cap evicts from the back.
    pub fn upsert(&mut self, entry: HistoryEntry) {
        self.entries
            .retain(|existing| !same_model(&existing.model_name, &entry.model_name));
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAP);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

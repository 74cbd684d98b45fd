//! Side-by-side comparison picks, drawn from history entries.

use thiserror::Error;

use crate::history::HistoryEntry;

/// Most models comparable at once.
pub const COMPARISON_CAP: usize = 5;
/// Fewest picks that make the comparison view worthwhile.
pub const COMPARISON_MIN: usize = 2;

#[derive(Error, Debug, PartialEq)]
pub enum ComparisonError {
    #[error("you can compare up to {COMPARISON_CAP} cars at a time")]
    CapacityReached,

    #[error("{0:?} is not in the search history")]
    UnknownModel(String),
}

/// Whether a toggle added or removed the model.
#[derive(Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Ephemeral pick list for the comparison view. Never persisted; clearing
/// the history clears this too.
#[derive(Debug, Clone, Default)]
pub struct ComparisonSet {
    picks: Vec<HistoryEntry>,
}

impl ComparisonSet {
    pub fn picks(&self) -> &[HistoryEntry] {
        &self.picks
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn contains(&self, model_name: &str) -> bool {
        self.position(model_name).is_some()
    }

    fn position(&self, model_name: &str) -> Option<usize> {
        self.picks
            .iter()
            .position(|pick| pick.model_name == model_name)
    }

    /// Flips membership for `entry`. Adding past the cap is rejected and
    /// the set is left untouched.
    pub fn toggle(&mut self, entry: &HistoryEntry) -> Result<ToggleOutcome, ComparisonError> {
        if let Some(index) = self.position(&entry.model_name) {
            self.picks.remove(index);
            return Ok(ToggleOutcome::Removed);
        }

        if self.picks.len() >= COMPARISON_CAP {
            return Err(ComparisonError::CapacityReached);
        }

        self.picks.push(entry.clone());
        Ok(ToggleOutcome::Added)
    }

    /// True once enough picks exist for the comparison view.
    pub fn can_compare(&self) -> bool {
        self.picks.len() >= COMPARISON_MIN
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }
}

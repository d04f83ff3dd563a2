//! Per-item outcomes and the batch summary.

use std::path::PathBuf;

use crate::outcome::ItemError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Destination already existed.
    Skipped(PathBuf),
    Saved(PathBuf),
    Failed(ItemError),
}

/// What happened to each processed item, in order. Items after a rate-limit abort are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub items: Vec<(String, ItemOutcome)>,
    /// Set when a 429 stopped the batch early.
    pub aborted: bool,
}

impl BatchReport {
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Saved(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|(_, o)| pred(o)).count()
    }
}

//! Per-check classification counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::classifier::Classification;

/// Count of conflicted files per [`Classification`] for one check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictSummary(BTreeMap<Classification, usize>);

impl ConflictSummary {
    /// Tally a set of per-file classifications.
    pub fn from_classifications<'a>(labels: impl IntoIterator<Item = &'a Classification>) -> Self {
        let mut counts = BTreeMap::new();
        for label in labels {
            *counts.entry(*label).or_insert(0) += 1;
        }
        Self(counts)
    }

    pub fn count(&self, label: Classification) -> usize {
        self.0.get(&label).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of classified files.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Entries in label order (`code`, `comment_only`, `unknown`).
    pub fn iter(&self) -> impl Iterator<Item = (Classification, usize)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Merge-level auto-resolvable signal derived from the tally.
    ///
    /// A conflicted merge with nothing classified is never auto-resolvable;
    /// otherwise any `code` or `unknown` file blocks it.
    pub fn auto_resolvable(&self, conflicts: bool) -> bool {
        if self.is_empty() {
            return !conflicts;
        }
        self.count(Classification::Code) == 0 && self.count(Classification::Unknown) == 0
    }
}

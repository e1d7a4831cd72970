//! The immutable result of one speculative merge check.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::conflict::{Classification, ConflictSummary};

/// Snapshot of what merging `head` into `base` would do.
///
/// A clean outcome always has empty `conflicted_files`,
/// `conflict_classification`, and `conflict_summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// Whether the merge attempt exited non-zero.
    pub conflicts: bool,
    /// Paths in an unmerged state, in `git status` order.
    pub conflicted_files: Vec<String>,
    /// Trimmed stdout + stderr of `git merge`.
    pub output: String,
    /// One label per conflicted path.
    pub conflict_classification: BTreeMap<String, Classification>,
    pub conflict_summary: ConflictSummary,
    /// Merge-level signal: clean, or every conflict is comment-only.
    pub auto_resolvable: bool,
}

impl MergeOutcome {
    pub fn clean(output: impl Into<String>) -> Self {
        Self {
            conflicts: false,
            conflicted_files: Vec::new(),
            output: output.into(),
            conflict_classification: BTreeMap::new(),
            conflict_summary: ConflictSummary::default(),
            auto_resolvable: true,
        }
    }

    /// Build a conflicted outcome; the summary and auto-resolvable signal
    /// are derived from `classification`.
    pub fn conflicted(
        output: impl Into<String>,
        conflicted_files: Vec<String>,
        classification: BTreeMap<String, Classification>,
    ) -> Self {
        let summary = ConflictSummary::from_classifications(classification.values());
        let auto_resolvable = summary.auto_resolvable(true);
        Self {
            conflicts: true,
            conflicted_files,
            output: output.into(),
            conflict_classification: classification,
            conflict_summary: summary,
            auto_resolvable,
        }
    }

    /// Classification of one path, if it conflicted.
    pub fn classification(&self, path: &str) -> Option<Classification> {
        self.conflict_classification.get(path).copied()
    }
}

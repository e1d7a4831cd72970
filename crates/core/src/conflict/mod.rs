//! Conflict parsing and classification.
//!
//! The conflict subsystem is responsible for:
//! 1. **Extraction** -- parsing conflict-marker regions into (ours, theirs) hunks.
//! 2. **Pruning** -- cancelling lines common to both sides of a hunk.
//! 3. **Classification** -- labelling each conflicted file `comment_only`,
//!    `code`, or `unknown`, and tallying the labels for a check.

pub mod classifier;
pub mod prune;
pub mod segments;
pub mod summary;

pub use classifier::{classify_conflicts, classify_file, classify_segments, is_comment_line, Classification};
pub use prune::prune_common_lines;
pub use segments::{extract_segments, ConflictSegment};
pub use summary::ConflictSummary;

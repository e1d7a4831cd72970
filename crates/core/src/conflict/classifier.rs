//! Hunk classification for conflicted files.
//!
//! A conflicted file is labelled by looking only at the lines that differ
//! between the two sides of each conflict region (see
//! [`prune_common_lines`](super::prune::prune_common_lines)):
//!
//! | Residual lines across all segments | Classification |
//! |------------------------------------|----------------|
//! | No segments parsed at all          | `Unknown`      |
//! | Any non-comment line               | `Code`         |
//! | Only comment/blank lines, or none  | `CommentOnly`  |
//!
//! The comment test is a plain line-prefix check. It is not language aware,
//! so the body of a block comment without a leading marker on each line
//! counts as code.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prune::prune_common_lines;
use super::segments::{extract_segments, ConflictSegment};

/// Label assigned to one conflicted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// At least one residual line is not a comment.
    Code,
    /// Every residual line is a comment or blank.
    CommentOnly,
    /// No conflict markers could be parsed (delete/modify, rename, binary,
    /// unreadable file).
    Unknown,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::CommentOnly => "comment_only",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const COMMENT_PREFIXES: [&str; 5] = ["#", "//", "/*", "*", "--"];

/// `true` for blank lines, lines starting with a common comment leader, and
/// complete single-line HTML comments.
pub fn is_comment_line(line: &str) -> bool {
    let stripped = line.trim();
    if stripped.is_empty() {
        return true;
    }
    if COMMENT_PREFIXES.iter().any(|p| stripped.starts_with(p)) {
        return true;
    }
    stripped.starts_with("<!--") && stripped.ends_with("-->")
}

/// Classify one file from its parsed conflict segments.
pub fn classify_segments(segments: &[ConflictSegment]) -> Classification {
    if segments.is_empty() {
        return Classification::Unknown;
    }
    for segment in segments {
        let (ours, theirs) = prune_common_lines(segment.ours.as_slice(), segment.theirs.as_slice());
        if ours.iter().chain(theirs.iter()).any(|line| !is_comment_line(line)) {
            return Classification::Code;
        }
    }
    Classification::CommentOnly
}

/// Classify a file on disk.
///
/// Any read failure (missing file after a delete/modify conflict, a
/// directory, permissions) yields [`Classification::Unknown`] instead of an
/// error. Invalid UTF-8 is decoded lossily.
pub fn classify_file(path: &Path) -> Classification {
    match std::fs::read(path) {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes);
            classify_segments(&extract_segments(&content))
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "conflicted file unreadable, classifying unknown");
            Classification::Unknown
        }
    }
}

/// Classify every conflicted path (relative to `worktree`).
pub fn classify_conflicts<S: AsRef<str>>(
    worktree: &Path,
    conflicted_files: &[S],
) -> BTreeMap<String, Classification> {
    let mut classifications = BTreeMap::new();
    for name in conflicted_files {
        let name = name.as_ref();
        let label = classify_file(&worktree.join(name));
        debug!(path = name, classification = %label, "classified conflict");
        if classifications.insert(name.to_string(), label).is_some() {
            warn!(path = name, "conflicted path reported twice");
        }
    }
    classifications
}

//! Conflict-marker region extraction.
//!
//! Scans file text for `<<<<<<<` / `=======` / `>>>>>>>` regions and reduces
//! each complete region to its "ours" and "theirs" lines. A diff3-style
//! `|||||||` base section is skipped, so the segment only ever holds the two
//! competing sides.

/// One conflict-marker region reduced to the competing line sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictSegment {
    pub ours: Vec<String>,
    pub theirs: Vec<String>,
}

impl ConflictSegment {
    pub fn new<S: Into<String>>(
        ours: impl IntoIterator<Item = S>,
        theirs: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            ours: ours.into_iter().map(Into::into).collect(),
            theirs: theirs.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    Ours,
    Base,
    Theirs,
}

const OURS_MARKER: &str = "<<<<<<<";
const BASE_MARKER: &str = "|||||||";
const SEPARATOR: &str = "=======";
const THEIRS_MARKER: &str = ">>>>>>>";

/// Parse every complete conflict region in `content`.
///
/// A region that is never closed yields no segment. A new `<<<<<<<` line
/// restarts the current region. Blank lines inside a region are kept as empty
/// strings.
pub fn extract_segments(content: &str) -> Vec<ConflictSegment> {
    let mut segments = Vec::new();
    let mut current = ConflictSegment::default();
    let mut state = ScanState::Outside;

    for line in content.lines() {
        if line.starts_with(OURS_MARKER) {
            current = ConflictSegment::default();
            state = ScanState::Ours;
            continue;
        }
        match state {
            ScanState::Outside => {}
            ScanState::Ours => {
                if line.starts_with(BASE_MARKER) {
                    state = ScanState::Base;
                } else if line.starts_with(SEPARATOR) {
                    state = ScanState::Theirs;
                } else {
                    current.ours.push(line.to_string());
                }
            }
            ScanState::Base => {
                if line.starts_with(SEPARATOR) {
                    state = ScanState::Theirs;
                }
            }
            ScanState::Theirs => {
                if line.starts_with(THEIRS_MARKER) {
                    segments.push(std::mem::take(&mut current));
                    state = ScanState::Outside;
                } else {
                    current.theirs.push(line.to_string());
                }
            }
        }
    }

    segments
}

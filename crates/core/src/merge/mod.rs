//! Speculative merge runner.

pub mod outcome;
pub mod speculative;
pub mod worktree;

pub use outcome::MergeOutcome;
pub use speculative::SpeculativeMerge;
pub use worktree::WorktreeGuard;

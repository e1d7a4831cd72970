//! specmerge core library.
//!
//! Answers "what would happen if `head` were merged into `base`?" without
//! touching the caller's checkout: the merge runs in a disposable worktree,
//! conflicted files are classified as comment-only, code, or unknown, and a
//! YAML policy maps each file to a resolution action.

pub mod conflict;
pub mod errors;
pub mod git;
pub mod merge;
pub mod plan;
pub mod policy;

// Re-exports for convenience.
pub use conflict::{Classification, ConflictSummary};
pub use errors::{CoreError, GitError, PolicyError};
pub use merge::{MergeOutcome, SpeculativeMerge};
pub use plan::{MergePlan, PlanStage, ResolutionPlanner};
pub use policy::{load_policy, MergePolicy, PolicyDocument};

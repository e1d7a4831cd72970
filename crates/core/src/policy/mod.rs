//! Merge resolution policy: YAML loading and the typed view the planner reads.

pub mod loader;
pub mod model;

pub use loader::{load_policy, resolve_policy_path, PolicyDocument, DEFAULT_POLICY, POLICY_ENV};
pub use model::{Heuristics, MergePolicy, PriorityRule, DEFAULT_FALLBACK};

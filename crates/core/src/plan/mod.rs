//! Merge planning: policy guidance for a speculative merge.

pub mod planner;

pub use planner::{MergePlan, PlanStage, ResolutionPlanner, AUTO_RESOLVE_COMMENT};

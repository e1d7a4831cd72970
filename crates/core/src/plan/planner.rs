//! Resolution planner.
//!
//! Combines a speculative merge outcome with the merge policy into a
//! [`MergePlan`]. Each planning run walks a fixed progression:
//!
//! 1. `init`: nothing loaded yet.
//! 2. `policy_loaded`: policy document parsed and viewed.
//! 3. `merge_evaluated`: speculative merge run and conflicts classified.
//! 4. `plan_ready`: per-file resolutions and the verdict computed.
//!
//! Failures before `merge_evaluated` propagate; the last step cannot fail.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_yaml::Mapping;
use tracing::{debug, info, instrument};

use crate::conflict::Classification;
use crate::errors::CoreError;
use crate::merge::{MergeOutcome, SpeculativeMerge};
use crate::policy::{load_policy, MergePolicy};

/// Resolution assigned to comment-only conflicts when the heuristic is on.
pub const AUTO_RESOLVE_COMMENT: &str = "auto_resolve_comment";

// ---------------------------------------------------------------------------
// Plan stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanStage {
    Init,
    PolicyLoaded,
    MergeEvaluated,
    PlanReady,
}

impl std::fmt::Display for PlanStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::PolicyLoaded => write!(f, "policy_loaded"),
            Self::MergeEvaluated => write!(f, "merge_evaluated"),
            Self::PlanReady => write!(f, "plan_ready"),
        }
    }
}

// ---------------------------------------------------------------------------
// MergePlan
// ---------------------------------------------------------------------------

/// Policy guidance for one base/head pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergePlan {
    pub base: String,
    pub head: String,
    pub result: MergeOutcome,
    /// Resolution action per conflicted path.
    pub resolutions: BTreeMap<String, String>,
    pub safety_checks: Vec<Mapping>,
    pub auto_resolve: bool,
    pub requires_manual_review: bool,
    pub policy_metadata: Mapping,
}

impl MergePlan {
    pub fn resolution(&self, path: &str) -> Option<&str> {
        self.resolutions.get(path).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// ResolutionPlanner
// ---------------------------------------------------------------------------

pub struct ResolutionPlanner;

impl ResolutionPlanner {
    /// Load the policy (bundled when `policy_path` is `None`), run the
    /// speculative merge, and build the plan.
    #[instrument(skip_all, fields(base = %base, head = %head))]
    pub fn plan(
        repo_path: impl AsRef<Path>,
        base: &str,
        head: &str,
        policy_path: Option<&Path>,
    ) -> Result<MergePlan, CoreError> {
        let mut stage = PlanStage::Init;
        debug!(%stage, "planning merge");

        let document = load_policy(policy_path)?;
        let policy = MergePolicy::from_document(&document);
        stage = PlanStage::PolicyLoaded;
        debug!(%stage, rules = policy.priority_rules.len(), "policy ready");

        let outcome = SpeculativeMerge::check(repo_path, base, head)?;
        stage = PlanStage::MergeEvaluated;
        debug!(%stage, conflicts = outcome.conflicts, "merge evaluated");

        let plan = Self::build(base, head, outcome, &policy);
        stage = PlanStage::PlanReady;
        info!(
            %stage,
            auto_resolve = plan.auto_resolve,
            files = plan.resolutions.len(),
            "merge plan ready"
        );
        Ok(plan)
    }

    /// Build a plan from an existing outcome. Pure; never fails.
    pub fn build(base: &str, head: &str, outcome: MergeOutcome, policy: &MergePolicy) -> MergePlan {
        let resolutions = Self::resolve_files(&outcome.conflict_classification, policy);
        let auto_resolve = Self::auto_resolve(&outcome, policy);

        MergePlan {
            base: base.to_string(),
            head: head.to_string(),
            result: outcome,
            resolutions,
            safety_checks: policy.safety_checks.clone(),
            auto_resolve,
            requires_manual_review: !auto_resolve,
            policy_metadata: policy.metadata.clone(),
        }
    }

    /// Per-file resolution: first matching priority rule, then the
    /// comment-only heuristic, then the fallback.
    pub fn resolve_files(
        classifications: &BTreeMap<String, Classification>,
        policy: &MergePolicy,
    ) -> BTreeMap<String, String> {
        classifications
            .iter()
            .map(|(path, classification)| {
                let resolution = if let Some(rule) = policy.match_rule(path) {
                    rule
                } else if *classification == Classification::CommentOnly
                    && policy.comment_heuristic()
                {
                    AUTO_RESOLVE_COMMENT
                } else {
                    policy.fallback.as_str()
                };
                debug!(path = %path, %classification, resolution, "file resolved");
                (path.clone(), resolution.to_string())
            })
            .collect()
    }

    /// Overall verdict. Priority rules never make a code conflict
    /// auto-resolvable.
    fn auto_resolve(outcome: &MergeOutcome, policy: &MergePolicy) -> bool {
        if !outcome.conflicts {
            return true;
        }
        let classifications = &outcome.conflict_classification;
        if !classifications.is_empty() && policy.comment_heuristic() {
            return classifications
                .values()
                .all(|c| *c == Classification::CommentOnly);
        }
        outcome.auto_resolvable
    }
}

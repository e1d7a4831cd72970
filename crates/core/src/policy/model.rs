//! Typed view over a policy document.
//!
//! Extraction is tolerant: a missing or wrongly shaped section reads as empty
//! instead of failing, so any mapping yields a usable [`MergePolicy`].
//!
//! Expected layout:
//!
//! ```yaml
//! merge_policy:
//!   conflict_resolution:
//!     priority_rules:
//!       - pattern: "infra/*.yml"
//!         resolution: main_wins
//!     fallback: manual_review
//!     heuristics:
//!       comment_only_conflicts_auto_resolve: true
//!   safety_checks: [...]
//!   metadata: {...}
//! ```

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::loader::PolicyDocument;
use crate::errors::PolicyError;

/// Resolution for files that match no rule and no heuristic.
pub const DEFAULT_FALLBACK: &str = "manual_review";

/// Stands in for `/` during matching; never appears in a git path.
const SEPARATOR_STANDIN: &str = "\u{1}";

/// A glob forcing a resolution for every file it matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityRule {
    pub pattern: String,
    pub resolution: String,
}

impl PriorityRule {
    pub fn new(pattern: impl Into<String>, resolution: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            resolution: resolution.into(),
        }
    }

    /// Whether `path` matches this rule's glob.
    ///
    /// Wildcards cross directory boundaries: `*.lock` matches
    /// `sub/Cargo.lock` and `docs/*` matches `docs/guide/intro.md`. Both
    /// sides have their separators swapped for a non-separator byte so
    /// glob-match never stops a `*` at a `/`.
    pub fn matches(&self, path: &str) -> bool {
        let pattern = self.pattern.replace('/', SEPARATOR_STANDIN);
        let path = path.replace(['\\', '/'], SEPARATOR_STANDIN);
        glob_match::glob_match(&pattern, &path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Heuristics {
    pub comment_only_conflicts_auto_resolve: bool,
}

/// Resolution policy consulted by the planner.
#[derive(Debug, Clone, PartialEq)]
pub struct MergePolicy {
    /// Evaluated in declared order; the first match wins.
    pub priority_rules: Vec<PriorityRule>,
    pub fallback: String,
    pub heuristics: Heuristics,
    /// Free-form records, passed through verbatim.
    pub safety_checks: Vec<Mapping>,
    pub metadata: Mapping,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            priority_rules: Vec::new(),
            fallback: DEFAULT_FALLBACK.to_string(),
            heuristics: Heuristics::default(),
            safety_checks: Vec::new(),
            metadata: Mapping::new(),
        }
    }
}

impl MergePolicy {
    /// Extract the typed policy from a loaded document.
    pub fn from_document(document: &PolicyDocument) -> Self {
        let merge_policy = document.get("merge_policy").and_then(Value::as_mapping);
        let Some(merge_policy) = merge_policy else {
            debug!("no merge_policy section, using defaults");
            return Self::default();
        };

        let mut policy = Self::default();

        if let Some(conflict) = merge_policy
            .get("conflict_resolution")
            .and_then(Value::as_mapping)
        {
            policy.priority_rules = conflict
                .get("priority_rules")
                .and_then(Value::as_sequence)
                .map(|rules| rules.iter().filter_map(parse_rule).collect())
                .unwrap_or_default();

            if let Some(fallback) = conflict.get("fallback").filter(|v| truthy(v)) {
                policy.fallback = scalar_string(fallback).unwrap_or_else(|| DEFAULT_FALLBACK.into());
            }

            policy.heuristics.comment_only_conflicts_auto_resolve = conflict
                .get("heuristics")
                .and_then(Value::as_mapping)
                .and_then(|h| h.get("comment_only_conflicts_auto_resolve"))
                .map(truthy)
                .unwrap_or(false);
        }

        policy.safety_checks = merge_policy
            .get("safety_checks")
            .and_then(Value::as_sequence)
            .map(|checks| {
                checks
                    .iter()
                    .filter_map(Value::as_mapping)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        policy.metadata = merge_policy
            .get("metadata")
            .and_then(Value::as_mapping)
            .cloned()
            .unwrap_or_default();

        debug!(
            rules = policy.priority_rules.len(),
            fallback = %policy.fallback,
            comment_heuristic = policy.heuristics.comment_only_conflicts_auto_resolve,
            safety_checks = policy.safety_checks.len(),
            "merge policy extracted"
        );
        policy
    }

    /// Resolution of the first rule whose glob matches `path`.
    pub fn match_rule(&self, path: &str) -> Option<&str> {
        self.priority_rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.resolution.as_str())
    }

    pub fn comment_heuristic(&self) -> bool {
        self.heuristics.comment_only_conflicts_auto_resolve
    }

    /// Render back to the document layout; loading the result yields an
    /// equal policy.
    pub fn to_yaml(&self) -> Result<String, PolicyError> {
        serde_yaml::to_string(&self.rendered()).map_err(|e| PolicyError::Serialize(e.to_string()))
    }

    /// The policy as a document, without a text round trip.
    pub fn to_document(&self) -> Result<PolicyDocument, PolicyError> {
        match serde_yaml::to_value(self.rendered()) {
            Ok(Value::Mapping(mapping)) => Ok(PolicyDocument::from_mapping(mapping)),
            Ok(_) => Err(PolicyError::Serialize("policy did not render as a mapping".into())),
            Err(e) => Err(PolicyError::Serialize(e.to_string())),
        }
    }

    fn rendered(&self) -> RenderedPolicy<'_> {
        RenderedPolicy {
            merge_policy: RenderedBody {
                conflict_resolution: RenderedConflictResolution {
                    priority_rules: &self.priority_rules,
                    fallback: &self.fallback,
                    heuristics: &self.heuristics,
                },
                safety_checks: &self.safety_checks,
                metadata: &self.metadata,
            },
        }
    }
}

#[derive(Serialize)]
struct RenderedPolicy<'a> {
    merge_policy: RenderedBody<'a>,
}

#[derive(Serialize)]
struct RenderedBody<'a> {
    conflict_resolution: RenderedConflictResolution<'a>,
    safety_checks: &'a [Mapping],
    metadata: &'a Mapping,
}

#[derive(Serialize)]
struct RenderedConflictResolution<'a> {
    priority_rules: &'a [PriorityRule],
    fallback: &'a str,
    heuristics: &'a Heuristics,
}

fn parse_rule(entry: &Value) -> Option<PriorityRule> {
    let rule = entry.as_mapping()?;
    let pattern = rule.get("pattern").and_then(Value::as_str)?;
    let resolution = rule.get("resolution").filter(|v| truthy(v))?;
    if pattern.is_empty() {
        return None;
    }
    Some(PriorityRule::new(pattern, scalar_string(resolution)?))
}

/// YAML truthiness: null, `false`, zero, and empty containers are false.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(tagged) => truthy(&tagged.value),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

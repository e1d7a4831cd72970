//! Merge policy document loading.
//!
//! A policy document is any YAML mapping. Loading never interprets the
//! contents beyond checking the top-level shape; see
//! [`MergePolicy`](super::model::MergePolicy) for the typed view.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

use crate::errors::PolicyError;
use crate::git::expand_tilde;

/// Policy compiled into the binary, used when no path is configured.
pub const DEFAULT_POLICY: &str = include_str!("../../policies/merge_policy.yaml");

/// Environment variable naming a policy file.
pub const POLICY_ENV: &str = "SPECMERGE_POLICY";

/// A parsed policy document: an order-preserving top-level mapping.
///
/// An empty document is represented by an empty mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyDocument {
    mapping: Mapping,
}

impl PolicyDocument {
    /// Parse YAML text. `origin` names the source in error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Self, PolicyError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(text).map_err(|e| PolicyError::Parse {
            path: origin.to_string(),
            detail: e.to_string(),
        })?;

        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(mapping) => Ok(Self { mapping }),
            other => Err(PolicyError::Format(describe(&other).to_string())),
        }
    }

    pub fn from_mapping(mapping: Mapping) -> Self {
        Self { mapping }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.mapping.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn into_mapping(self) -> Mapping {
        self.mapping
    }
}

/// Load a policy document.
///
/// With no path the bundled [`DEFAULT_POLICY`] is used. A path that does not
/// exist loads as an empty document.
pub fn load_policy(path: Option<&Path>) -> Result<PolicyDocument, PolicyError> {
    let Some(path) = path else {
        debug!("loading bundled merge policy");
        return PolicyDocument::parse(DEFAULT_POLICY, "<bundled>");
    };

    let path = expand_tilde(path);
    info!(path = %path.display(), "loading merge policy");

    if !path.exists() {
        warn!(path = %path.display(), "merge policy file not found, using empty policy");
        return Ok(PolicyDocument::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    let document = PolicyDocument::parse(&contents, &path.display().to_string())?;
    debug!(keys = document.as_mapping().len(), "merge policy parsed");
    Ok(document)
}

/// Pick the policy path: an explicit path wins, then [`POLICY_ENV`]. `None`
/// means the bundled policy.
pub fn resolve_policy_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    match std::env::var(POLICY_ENV) {
        Ok(val) if !val.trim().is_empty() => {
            debug!(env = POLICY_ENV, path = %val, "policy path from environment");
            Some(PathBuf::from(val))
        }
        _ => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_policy_parses() {
        let doc = load_policy(None).unwrap();
        assert!(doc.get("merge_policy").is_some());
    }

    #[test]
    fn test_blank_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        std::fs::write(&path, "").unwrap();
        assert!(load_policy(Some(&path)).unwrap().is_empty());

        std::fs::write(&path, "# only a comment\n").unwrap();
        assert!(load_policy(Some(&path)).unwrap().is_empty());

        std::fs::write(&path, "~\n").unwrap();
        assert!(load_policy(Some(&path)).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let doc = load_policy(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_non_mapping_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        std::fs::write(&path, "[]").unwrap();
        let err = load_policy(Some(&path)).unwrap_err();
        assert!(matches!(err, PolicyError::Format(ref kind) if kind == "a sequence"));

        std::fs::write(&path, "just words").unwrap();
        assert!(matches!(
            load_policy(Some(&path)),
            Err(PolicyError::Format(_))
        ));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = PolicyDocument::parse("merge_policy: [unclosed", "inline").unwrap_err();
        assert!(matches!(err, PolicyError::Parse { ref path, .. } if path == "inline"));
    }

    #[test]
    fn test_mapping_order_preserved() {
        let doc = PolicyDocument::parse("zeta: 1\nalpha: 2\n", "inline").unwrap();
        let keys: Vec<&str> = doc
            .as_mapping()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_resolve_policy_path_prefers_explicit() {
        let explicit = Path::new("/etc/specmerge/policy.yaml");
        assert_eq!(
            resolve_policy_path(Some(explicit)),
            Some(explicit.to_path_buf())
        );
    }
}

//! Repository and ref resolution.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::command::run_git;
use crate::errors::GitError;

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Validate `path` and return the root of the git work tree containing it.
///
/// Fails with [`GitError::RepositoryNotFound`] if the path does not exist and
/// with [`GitError::NotARepository`] if `git rev-parse --show-toplevel`
/// rejects it.
pub fn resolve_repository(path: impl AsRef<Path>) -> Result<PathBuf, GitError> {
    let expanded = expand_tilde(path.as_ref());
    let repo = std::fs::canonicalize(&expanded)
        .map_err(|_| GitError::RepositoryNotFound(expanded.display().to_string()))?;

    let result = run_git(&["rev-parse", "--show-toplevel"], &repo, false)?;
    if !result.success() {
        return Err(GitError::NotARepository {
            path: repo.display().to_string(),
            detail: result.stderr.trim().to_string(),
        });
    }

    let root = PathBuf::from(result.stdout.trim());
    info!(path = %repo.display(), root = %root.display(), "resolved repository");
    Ok(root)
}

/// Verify that `reference` names a commit in `repo` and return its SHA.
pub fn verify_ref(repo: &Path, reference: &str) -> Result<String, GitError> {
    // A leading dash would be parsed as an option by rev-parse.
    if reference.is_empty() || reference.starts_with('-') {
        return Err(GitError::RefNotFound {
            reference: reference.to_string(),
            detail: "not a valid ref name".into(),
        });
    }

    let spec = format!("{}^{{commit}}", reference);
    let result = run_git(&["rev-parse", "--verify", "--quiet", spec.as_str()], repo, false)?;
    if !result.success() {
        return Err(GitError::RefNotFound {
            reference: reference.to_string(),
            detail: if result.stderr.trim().is_empty() {
                "does not resolve to a commit".into()
            } else {
                result.stderr.trim().to_string()
            },
        });
    }

    let sha = result.stdout.trim().to_string();
    debug!(reference, sha = %sha, "verified ref");
    Ok(sha)
}

//! Error types for the specmerge core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them for callers that want a single
//! error type.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

// ---------------------------------------------------------------------------
// Git errors
// ---------------------------------------------------------------------------

/// Errors from running `git` and resolving repositories and refs.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary was not found on `$PATH`.
    #[error("git binary not found on PATH")]
    BinaryNotFound,

    /// A checked `git` command exited with a non-zero status.
    #[error("git command failed (exit {exit_code}) in '{}': {command}: {}", cwd.display(), stderr.trim())]
    CommandFailed {
        command: String,
        cwd: PathBuf,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// The repository path does not exist.
    #[error("repository path does not exist: '{0}'")]
    RepositoryNotFound(String),

    /// The path exists but is not inside a git work tree.
    #[error("'{path}' is not a git repository: {detail}")]
    NotARepository { path: String, detail: String },

    /// A base or head ref could not be resolved to a commit.
    #[error("git ref not found: '{reference}': {detail}")]
    RefNotFound { reference: String, detail: String },

    /// Generic I/O wrapper (spawning git, creating temp directories).
    #[error("git I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GitError {
    /// Combined stdout and stderr captured from a failed command, if any.
    pub fn captured_output(&self) -> Option<String> {
        match self {
            Self::CommandFailed { stdout, stderr, .. } => {
                Some(format!("{}{}", stdout, stderr).trim().to_string())
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Policy errors
// ---------------------------------------------------------------------------

/// Errors from loading a merge policy document.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The parsed document is valid YAML but not a mapping.
    #[error("merge policy must be a mapping, found {0}")]
    Format(String),

    /// The document is not valid YAML.
    #[error("merge policy parse error in '{path}': {detail}")]
    Parse { path: String, detail: String },

    /// The policy could not be rendered back to YAML.
    #[error("merge policy serialization error: {0}")]
    Serialize(String),

    /// Generic I/O error reading the policy file.
    #[error("merge policy I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = GitError::RepositoryNotFound("/tmp/missing".into());
        assert_eq!(
            err.to_string(),
            "repository path does not exist: '/tmp/missing'"
        );

        let err = GitError::RefNotFound {
            reference: "feature".into(),
            detail: "fatal: Needed a single revision".into(),
        };
        assert!(err.to_string().contains("'feature'"));

        let err = PolicyError::Format("a sequence".into());
        assert_eq!(
            err.to_string(),
            "merge policy must be a mapping, found a sequence"
        );
    }

    #[test]
    fn test_command_failed_carries_output() {
        let err = GitError::CommandFailed {
            command: "git worktree add --detach /tmp/x main".into(),
            cwd: PathBuf::from("/repo"),
            exit_code: 128,
            stdout: String::new(),
            stderr: "fatal: invalid reference: main\n".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit 128"));
        assert!(msg.contains("/repo"));
        assert!(msg.contains("invalid reference"));
        assert_eq!(
            err.captured_output().as_deref(),
            Some("fatal: invalid reference: main")
        );
        assert!(GitError::BinaryNotFound.captured_output().is_none());
    }

    #[test]
    fn test_core_error_from_subsystem() {
        let core: CoreError = GitError::BinaryNotFound.into();
        assert!(matches!(core, CoreError::Git(_)));

        let core: CoreError = PolicyError::Format("a string".into()).into();
        assert!(matches!(core, CoreError::Policy(_)));
    }
}

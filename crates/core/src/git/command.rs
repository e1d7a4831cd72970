//! Synchronous adapter over the `git` executable.
//!
//! This layer only spawns processes and captures their output. It does not
//! interpret git semantics beyond mapping a non-zero exit to
//! [`GitError::CommandFailed`] when the caller asks for a checked run.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::errors::GitError;

/// Captured result of a single `git` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommandResult {
    /// Full argument vector, starting with `git`.
    pub command: Vec<String>,
    /// Process exit code (`-1` when terminated by a signal).
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl GitCommandResult {
    /// `true` if the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The command rendered as a single shell-like line (for logs and errors).
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }

    /// Stdout followed by stderr, trimmed.
    pub fn combined_output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr).trim().to_string()
    }
}

/// Run `git <args>` in `cwd` and capture its output.
///
/// When `check` is set, a non-zero exit is returned as
/// [`GitError::CommandFailed`] carrying the command, directory, and output.
/// Otherwise the result is returned regardless of the exit code.
pub fn run_git<S: AsRef<str>>(
    args: &[S],
    cwd: &Path,
    check: bool,
) -> Result<GitCommandResult, GitError> {
    let mut command = vec!["git".to_string()];
    command.extend(args.iter().map(|a| a.as_ref().to_string()));

    debug!(cmd = %command.join(" "), cwd = %cwd.display(), "running git command");

    let output = Command::new("git")
        .args(&command[1..])
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound && cwd.is_dir() {
                GitError::BinaryNotFound
            } else {
                GitError::IoError(e)
            }
        })?;

    let result = GitCommandResult {
        command,
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };

    if !result.success() {
        if check {
            warn!(
                cmd = %result.command_line(),
                exit_code = result.exit_code,
                stderr = %result.stderr.trim(),
                "git command failed"
            );
            return Err(GitError::CommandFailed {
                command: result.command_line(),
                cwd: cwd.to_path_buf(),
                exit_code: result.exit_code,
                stdout: result.stdout,
                stderr: result.stderr,
            });
        }
        debug!(
            cmd = %result.command_line(),
            exit_code = result.exit_code,
            "git command exited non-zero (unchecked)"
        );
    }

    Ok(result)
}

/// Returns `true` if a `git` binary can be spawned from `$PATH`.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_helpers() {
        let result = GitCommandResult {
            command: vec!["git".into(), "merge".into(), "feature".into()],
            exit_code: 1,
            stdout: "Auto-merging a.txt\n".into(),
            stderr: "CONFLICT (content)\n".into(),
        };
        assert!(!result.success());
        assert_eq!(result.command_line(), "git merge feature");
        assert_eq!(
            result.combined_output(),
            "Auto-merging a.txt\nCONFLICT (content)"
        );
    }

    #[test]
    fn test_checked_failure_carries_output() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let err = run_git(&["rev-parse", "--show-toplevel"], dir.path(), true).unwrap_err();
        match err {
            GitError::CommandFailed {
                command,
                cwd,
                exit_code,
                stderr,
                ..
            } => {
                assert_eq!(command, "git rev-parse --show-toplevel");
                assert_eq!(cwd, dir.path());
                assert_ne!(exit_code, 0);
                assert!(!stderr.is_empty());
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_unchecked_failure_returns_result() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let result = run_git(&["rev-parse", "--show-toplevel"], dir.path(), false).unwrap();
        assert!(!result.success());
        assert!(!result.stderr.is_empty());
    }

    #[test]
    fn test_missing_cwd_is_io_error() {
        let err = run_git(&["status"], Path::new("/nonexistent/specmerge-cwd"), true).unwrap_err();
        assert!(matches!(err, GitError::IoError(_)));
    }
}

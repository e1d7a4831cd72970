//! Disposable detached worktree with guaranteed teardown.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::errors::GitError;
use crate::git::run_git;

const WORKTREE_PREFIX: &str = "specmerge-";

/// A detached checkout of `commit` in a fresh temporary directory.
///
/// Dropping the guard aborts any in-progress merge, hard-resets the
/// checkout, and unregisters the worktree from the source repository.
/// Teardown failures are logged and swallowed; the temporary directory is
/// removed afterwards regardless.
pub struct WorktreeGuard {
    repo_root: PathBuf,
    dir: TempDir,
}

impl WorktreeGuard {
    /// `git worktree add --detach <tmp> <commit>` from `repo_root`.
    pub fn create(repo_root: &Path, commit: &str) -> Result<Self, GitError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKTREE_PREFIX)
            .tempdir()?;
        let path = dir.path().display().to_string();

        run_git(
            &["worktree", "add", "--detach", path.as_str(), commit],
            repo_root,
            true,
        )?;
        info!(worktree = %path, commit, "created speculative worktree");

        Ok(Self {
            repo_root: repo_root.to_path_buf(),
            dir,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn teardown(&self) {
        let path = self.dir.path().display().to_string();

        // No merge in progress is a normal outcome here.
        if let Err(e) = run_git(&["merge", "--abort"], self.path(), false) {
            debug!(error = %e, "merge --abort could not run");
        }

        match run_git(&["reset", "--hard", "--quiet"], self.path(), false) {
            Ok(r) if !r.success() => warn!(stderr = %r.stderr.trim(), "worktree reset failed"),
            Err(e) => warn!(error = %e, "worktree reset could not run"),
            Ok(_) => {}
        }

        match run_git(
            &["worktree", "remove", "--force", path.as_str()],
            &self.repo_root,
            false,
        ) {
            Ok(r) if !r.success() => {
                warn!(worktree = %path, stderr = %r.stderr.trim(), "worktree remove failed")
            }
            Err(e) => warn!(worktree = %path, error = %e, "worktree remove could not run"),
            Ok(_) => debug!(worktree = %path, "removed speculative worktree"),
        }
    }
}

impl Drop for WorktreeGuard {
    fn drop(&mut self) {
        self.teardown();
    }
}

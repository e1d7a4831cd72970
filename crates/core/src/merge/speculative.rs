//! Non-destructive merge simulation.
//!
//! The merge is attempted in a disposable detached worktree that shares the
//! object store with the source repository. The caller's branch, index, and
//! HEAD are never touched:
//!
//! 1. Resolve the repository root and verify both refs (no side effects yet).
//! 2. `git worktree add --detach <tmp> <base>`.
//! 3. `git merge --no-commit --no-ff <head>` inside the worktree, under a
//!    throwaway identity so hosts without `user.email` still get a verdict.
//! 4. On a non-zero exit, read unmerged paths from `git status` and classify
//!    each conflicted file.
//! 5. Tear the worktree down (see [`WorktreeGuard`]), even on error.

use std::path::Path;

use tracing::{info, instrument};

use super::outcome::MergeOutcome;
use super::worktree::WorktreeGuard;
use crate::conflict::classify_conflicts;
use crate::errors::GitError;
use crate::git::{resolve_repository, run_git, verify_ref};

/// Two-letter porcelain status codes of unmerged paths.
const UNMERGED_CODES: [&str; 7] = ["DD", "AU", "UD", "UA", "DU", "AA", "UU"];

/// Identity for the merge attempt. Nothing is committed, but `git merge`
/// refuses to start without a committer.
const MERGE_USER_NAME: &str = "user.name=specmerge";
const MERGE_USER_EMAIL: &str = "user.email=specmerge@localhost";

/// Stateless speculative merge runner.
pub struct SpeculativeMerge;

impl SpeculativeMerge {
    /// Report what merging `head` into `base` in `repo_path` would do.
    ///
    /// Setup failures (missing path, not a repository, unknown ref, failed
    /// worktree creation) propagate. The worktree is always removed before
    /// this returns.
    #[instrument(skip_all, fields(repo = %repo_path.as_ref().display(), base = %base, head = %head))]
    pub fn check(
        repo_path: impl AsRef<Path>,
        base: &str,
        head: &str,
    ) -> Result<MergeOutcome, GitError> {
        let root = resolve_repository(repo_path.as_ref())?;
        let base_sha = verify_ref(&root, base)?;
        let head_sha = verify_ref(&root, head)?;

        let worktree = WorktreeGuard::create(&root, &base_sha)?;
        let outcome = Self::attempt(&worktree, &head_sha)?;

        info!(
            conflicts = outcome.conflicts,
            files = outcome.conflicted_files.len(),
            auto_resolvable = outcome.auto_resolvable,
            "speculative merge complete"
        );
        Ok(outcome)
    }

    fn attempt(worktree: &WorktreeGuard, head_sha: &str) -> Result<MergeOutcome, GitError> {
        let merge = run_git(
            &[
                "-c",
                MERGE_USER_NAME,
                "-c",
                MERGE_USER_EMAIL,
                "merge",
                "--no-commit",
                "--no-ff",
                head_sha,
            ],
            worktree.path(),
            false,
        )?;
        let output = merge.combined_output();

        if merge.success() {
            return Ok(MergeOutcome::clean(output));
        }

        let status = run_git(&["status", "--porcelain", "-z"], worktree.path(), true)?;
        let conflicted_files = parse_unmerged_paths(&status.stdout);
        let classification = classify_conflicts(worktree.path(), &conflicted_files);

        Ok(MergeOutcome::conflicted(output, conflicted_files, classification))
    }
}

/// Extract unmerged paths from `git status --porcelain -z` output.
///
/// Records are `XY <path>` separated by NUL; rename and copy records carry
/// their origin path as an extra record, which is skipped.
pub fn parse_unmerged_paths(porcelain_z: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut records = porcelain_z.split('\0').filter(|r| !r.is_empty());

    while let Some(record) = records.next() {
        let (code, path) = match (record.get(..2), record.get(3..)) {
            (Some(code), Some(path)) => (code, path),
            _ => continue,
        };
        if code.starts_with('R') || code.starts_with('C') {
            records.next();
        }
        if UNMERGED_CODES.contains(&code) {
            paths.push(path.to_string());
        }
    }

    paths
}

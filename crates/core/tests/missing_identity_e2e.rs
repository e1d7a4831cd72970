//! Speculative merge on a host with no git identity configured.
//!
//! CI runners often have no `user.name`/`user.email`. A clean merge must
//! still report clean there. This lives in its own test binary because it
//! rewrites process-wide environment variables (`HOME`, git config lookup).
//!
//! Skips gracefully if `git` is not installed.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use specmerge_core::git::git_available;
use specmerge_core::SpeculativeMerge;

/// Run git with a one-off identity; the repository itself stores none.
fn git(repo: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(["-c", "user.name=Seed User", "-c", "user.email=seed@example.com"])
        .args(args)
        .current_dir(repo)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn commit_file(repo: &Path, name: &str, content: &str, message: &str) {
    std::fs::write(repo.join(name), content).unwrap();
    git(repo, &["add", name]);
    git(repo, &["commit", "--quiet", "-m", message]);
}

fn isolate_git_config(tmp: &Path) {
    let home = tmp.join("home");
    std::fs::create_dir_all(&home).unwrap();
    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", tmp.join("xdg"));
    std::env::set_var("GIT_CONFIG_NOSYSTEM", "1");
    std::env::set_var("GIT_CONFIG_GLOBAL", home.join("absent.gitconfig"));
    for var in [
        "GIT_AUTHOR_NAME",
        "GIT_AUTHOR_EMAIL",
        "GIT_COMMITTER_NAME",
        "GIT_COMMITTER_EMAIL",
        "EMAIL",
    ] {
        std::env::remove_var(var);
    }
}

#[test]
fn test_clean_merge_without_identity() {
    if !git_available() {
        eprintln!("SKIPPED: git not found in PATH");
        return;
    }

    let tmp = TempDir::new().unwrap();
    isolate_git_config(tmp.path());

    let repo = tmp.path().join("repo");
    std::fs::create_dir_all(&repo).unwrap();
    git(&repo, &["init", "--quiet"]);
    git(&repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    // Never guess an identity from the hostname.
    git(&repo, &["config", "user.useConfigOnly", "true"]);
    git(&repo, &["config", "commit.gpgsign", "false"]);

    commit_file(&repo, "a.txt", "one\n", "seed a");
    commit_file(&repo, "b.txt", "two\n", "seed b");
    git(&repo, &["checkout", "--quiet", "-b", "feature"]);
    commit_file(&repo, "a.txt", "one\nfeature\n", "feature change");
    git(&repo, &["checkout", "--quiet", "main"]);
    commit_file(&repo, "b.txt", "two\nmain\n", "main change");

    let outcome = SpeculativeMerge::check(&repo, "main", "feature").unwrap();

    assert!(!outcome.conflicts, "unexpected conflict: {}", outcome.output);
    assert!(outcome.conflicted_files.is_empty());
    assert!(outcome.auto_resolvable);

    let repo_handle = git2::Repository::open(&repo).unwrap();
    assert_eq!(repo_handle.worktrees().unwrap().len(), 0);
}

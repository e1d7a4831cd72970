//! Git process adapter and repository resolution.

pub mod command;
pub mod repository;

pub use command::{git_available, run_git, GitCommandResult};
pub use repository::{expand_tilde, resolve_repository, verify_ref};

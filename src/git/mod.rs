//! Source control abstraction.
//!
//! Release pipelines need three git operations: a cleanliness gate before a
//! build, committing the version bump, and force-tagging a successful
//! publish. The [Scm] trait keeps those mockable:
//!
//! - [repo::GitRepo]: real implementation using the `git2` crate
//! - [mock::MockScm]: test implementation recording commits and tags

pub mod mock;
pub mod repo;

pub use mock::MockScm;
pub use repo::GitRepo;

use crate::error::Result;

/// Source control operations needed by release pipelines.
pub trait Scm {
    /// Whether the working tree has no uncommitted changes, untracked files
    /// included (the equivalent of an empty `git status --porcelain`).
    fn is_clean(&self) -> Result<bool>;

    /// Stage all changes and commit them with the given message.
    fn commit_all(&self, message: &str) -> Result<()>;

    /// Tag the current HEAD, replacing any existing tag of the same name.
    /// The last successful publish of a given version wins.
    fn force_tag(&self, name: &str) -> Result<()>;
}

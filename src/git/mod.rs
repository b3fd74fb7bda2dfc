//! Repository access: staged changes, recent history and commit creation.

pub mod command;
pub mod exclude;
pub mod repository;

pub use exclude::{DEFAULT_EXCLUDE_FILES, ExcludePatterns};
pub use repository::GitRepository;

use crate::error::GitError;

/// The view of a repository the commit workflow needs.
///
/// Paths are repository-relative with `/` separators. All reads describe the
/// staged (index) state compared to HEAD.
#[cfg_attr(test, mockall::automock)]
pub trait RepositorySnapshot {
    /// Paths with staged changes, sorted, minus any matching `exclude`.
    fn staged_files(&self, exclude: &ExcludePatterns) -> Result<Vec<String>, GitError>;

    /// Unified diff of the staged changes, restricted to non-excluded paths.
    fn diff(&self, exclude: &ExcludePatterns) -> Result<String, GitError>;

    /// The `max_count` most recent commit messages, oldest first.
    fn recent_logs(&self, max_count: usize) -> Result<Vec<String>, GitError>;

    /// Id of the tree the index would commit, including excluded paths.
    fn staged_tree(&self) -> Result<String, GitError>;

    /// Create a commit from the current index. One attempt, no retry.
    fn commit(&self, message: &str) -> Result<(), GitError>;
}

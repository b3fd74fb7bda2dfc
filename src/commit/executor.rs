//! One commit attempt against the repository.

use tracing::{debug, warn};

use crate::error::GitError;
use crate::git::RepositorySnapshot;

/// Runs exactly one commit per call. Retry policy belongs to the caller.
pub struct CommitExecutor<'r, R: RepositorySnapshot + ?Sized> {
    repo: &'r R,
}

impl<'r, R: RepositorySnapshot + ?Sized> CommitExecutor<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    /// Commit the index with `message`, provided it still holds
    /// `staged_tree`, the tree the message was generated from.
    pub fn commit(&self, message: &str, staged_tree: &str) -> Result<(), GitError> {
        let current = self.repo.staged_tree()?;
        if current != staged_tree {
            warn!("Index moved from {} to {} since generation", staged_tree, current);
            return Err(GitError::StagedChangesMoved);
        }

        debug!("Committing with message of {} bytes", message.len());
        self.repo.commit(message)
    }
}

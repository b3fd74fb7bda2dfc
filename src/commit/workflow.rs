//! Top-level commit workflow: staged check, snapshot, interactive loop.

use tracing::debug;

use crate::commit::controller::{InteractionController, Outcome, RepositoryContext};
use crate::commit::engine::ConversationEngine;
use crate::commit::executor::CommitExecutor;
use crate::error::WorkflowError;
use crate::git::{ExcludePatterns, RepositorySnapshot};
use crate::llm::Provider;
use crate::terminal::Terminal;

/// Run one invocation against `repo` using `provider`.
///
/// Returns [`Outcome::NothingStaged`] without contacting the model when no
/// non-excluded file is staged.
pub async fn run_workflow<R, T>(
    repo: &R,
    provider: &Provider,
    terminal: &T,
    exclude: &ExcludePatterns,
) -> Result<Outcome, WorkflowError>
where
    R: RepositorySnapshot + ?Sized,
    T: Terminal + ?Sized,
{
    let staged = repo.staged_files(exclude)?;
    debug!("{} staged files after exclusion", staged.len());

    if staged.is_empty() {
        terminal.show_status("No staged changes found.");
        if !exclude.is_empty() && !repo.staged_files(&ExcludePatterns::none())?.is_empty() {
            terminal.show_status(
                "Only excluded files (lockfiles) are staged. Use --include-lockfiles to commit them.",
            );
        }
        return Ok(Outcome::NothingStaged);
    }

    let context = RepositoryContext::capture(repo, exclude)?;

    let mut controller = InteractionController::new(
        ConversationEngine::new(provider.chat_model.as_ref()),
        CommitExecutor::new(repo),
        terminal,
        context,
    )
    .with_status_label(provider.label());

    controller.run().await
}

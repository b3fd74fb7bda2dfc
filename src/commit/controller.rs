//! The interactive generate / review / commit loop.

use tracing::debug;

use crate::commit::engine::ConversationEngine;
use crate::commit::executor::CommitExecutor;
use crate::commit::prompt::GenerationRequest;
use crate::commit::turn::ConversationHistory;
use crate::error::{EXIT_FAILURE, GitError, WorkflowError};
use crate::git::{ExcludePatterns, RepositorySnapshot};
use crate::terminal::{KeyInput, Terminal};

/// Number of recent commit messages given to the model as style examples.
pub const RECENT_LOG_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Generating,
    AwaitingDecision,
    Committing,
    Aborted,
    Completed,
}

/// What the user chose to do with the current candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Commit,
    Regenerate,
    Quit,
}

impl Decision {
    /// Map a key press to a decision. Unrecognized keys yield `None`.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'c' => Some(Decision::Commit),
            'r' => Some(Decision::Regenerate),
            'q' => Some(Decision::Quit),
            _ => None,
        }
    }
}

/// How a workflow invocation ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Committed,
    NothingStaged,
    Aborted,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Committed | Outcome::NothingStaged => 0,
            Outcome::Aborted => EXIT_FAILURE,
        }
    }
}

/// Diff and log examples captured once at workflow start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryContext {
    pub diff: String,
    pub recent_logs: Vec<String>,
    /// Index tree the diff was taken from. Commits are refused once the
    /// index no longer matches it.
    pub staged_tree: String,
}

impl RepositoryContext {
    pub fn capture<R: RepositorySnapshot + ?Sized>(
        repo: &R,
        exclude: &ExcludePatterns,
    ) -> Result<Self, GitError> {
        let staged_tree = repo.staged_tree()?;
        let diff = repo.diff(exclude)?;
        let recent_logs = repo.recent_logs(RECENT_LOG_COUNT)?;
        debug!(
            "Captured diff of {} bytes and {} recent commits at tree {}",
            diff.len(),
            recent_logs.len(),
            staged_tree
        );
        Ok(Self {
            diff,
            recent_logs,
            staged_tree,
        })
    }
}

/// Drives one invocation from the first generation to a terminal state.
pub struct InteractionController<'a, R: RepositorySnapshot + ?Sized, T: Terminal + ?Sized> {
    engine: ConversationEngine<'a>,
    executor: CommitExecutor<'a, R>,
    terminal: &'a T,
    context: RepositoryContext,
    status_label: Option<String>,
    history: ConversationHistory,
    state: InteractionState,
}

impl<'a, R: RepositorySnapshot + ?Sized, T: Terminal + ?Sized> InteractionController<'a, R, T> {
    pub fn new(
        engine: ConversationEngine<'a>,
        executor: CommitExecutor<'a, R>,
        terminal: &'a T,
        context: RepositoryContext,
    ) -> Self {
        Self {
            engine,
            executor,
            terminal,
            context,
            status_label: None,
            history: ConversationHistory::new(),
            state: InteractionState::Generating,
        }
    }

    /// Label shown next to the generating status, usually `provider/model`.
    pub fn with_status_label(mut self, label: impl Into<String>) -> Self {
        self.status_label = Some(label.into());
        self
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn context(&self) -> &RepositoryContext {
        &self.context
    }

    pub async fn run(&mut self) -> Result<Outcome, WorkflowError> {
        loop {
            debug!("Interaction state: {:?}", self.state);

            match self.state {
                InteractionState::Generating => self.generate().await?,
                InteractionState::AwaitingDecision => self.await_decision()?,
                InteractionState::Committing => self.commit()?,
                InteractionState::Aborted => return Ok(Outcome::Aborted),
                InteractionState::Completed => return Ok(Outcome::Committed),
            }
        }
    }

    async fn generate(&mut self) -> Result<(), WorkflowError> {
        let status = match &self.status_label {
            Some(label) => format!("Generating commit message... ({})", label),
            None => "Generating commit message...".to_string(),
        };
        self.terminal.show_status(&status);

        let request = GenerationRequest {
            diff: &self.context.diff,
            recent_logs: &self.context.recent_logs,
            history: self.history.turns(),
        };

        let message = self
            .engine
            .generate(&request)
            .await
            .map_err(WorkflowError::Generation)?;

        self.history.push_generated(message);
        self.state = InteractionState::AwaitingDecision;
        Ok(())
    }

    fn await_decision(&mut self) -> Result<(), WorkflowError> {
        let Some(message) = self.history.latest_message() else {
            self.state = InteractionState::Generating;
            return Ok(());
        };
        self.terminal.show_candidate(message);

        self.state = match self.read_decision()? {
            Decision::Commit => InteractionState::Committing,
            Decision::Quit => InteractionState::Aborted,
            Decision::Regenerate => {
                let feedback = self.terminal.read_feedback()?;
                if feedback.trim().is_empty() {
                    debug!("Empty feedback, aborting");
                    InteractionState::Aborted
                } else {
                    self.history.push_feedback(&feedback);
                    InteractionState::Generating
                }
            }
        };
        Ok(())
    }

    fn read_decision(&self) -> Result<Decision, WorkflowError> {
        loop {
            match self.terminal.read_key()? {
                KeyInput::Char(c) => {
                    if let Some(decision) = Decision::from_key(c) {
                        return Ok(decision);
                    }
                }
                KeyInput::Interrupt => return Err(WorkflowError::Interrupted),
                KeyInput::Other => {}
            }
        }
    }

    fn commit(&mut self) -> Result<(), WorkflowError> {
        let Some(message) = self.history.latest_message() else {
            self.state = InteractionState::Generating;
            return Ok(());
        };

        match self.executor.commit(message, &self.context.staged_tree) {
            Ok(()) => {
                self.terminal.show_committed();
                self.state = InteractionState::Completed;
            }
            Err(err) => {
                self.terminal.show_commit_failure(&err.to_string());
                if !self.terminal.confirm_retry()? {
                    return Err(WorkflowError::Commit(err));
                }
                debug!("Retrying commit");
            }
        }
        Ok(())
    }
}

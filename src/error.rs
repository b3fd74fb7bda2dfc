//! Error types for git-aicommit modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ProviderKind;

/// Exit code for handled errors and deliberate aborts.
pub const EXIT_FAILURE: u8 = 1;

/// Exit code when the process receives an interrupt signal.
pub const EXIT_INTERRUPTED: u8 = 130;

/// Errors from configuration discovery, parsing and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Configuration file not found in {} or any parent directory. Run 'git-aicommit init' to create one.",
        searched_from.display()
    )]
    NotFound { searched_from: PathBuf },

    #[error("Failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: '{provider}' settings are required when provider is '{provider}'")]
    MissingProviderSettings { provider: ProviderKind },

    #[error("Configuration file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to write configuration file: {0}")]
    WriteFailed(#[source] std::io::Error),
}

/// Errors from repository operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to collect staged changes: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to read commit history: {0}")]
    LogFailed(#[source] git2::Error),

    #[error("git executable not found in PATH")]
    GitNotInstalled,

    #[error("Failed to run git: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("{detail}")]
    CommitFailed { detail: String },

    #[error("Staged changes differ from the ones the message was generated for")]
    StagedChangesMoved,
}

/// Errors from a single language-model request.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} request failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    #[error("{provider} credential missing: set {env_var}")]
    MissingCredential {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("{provider} returned an unexpected response: {detail}")]
    InvalidResponse {
        provider: &'static str,
        detail: String,
    },
}

/// Errors from reading user input.
#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("Failed to read input: {0}")]
    Io(#[source] std::io::Error),

    #[error("Interrupted")]
    Interrupted,
}

impl From<std::io::Error> for TerminalError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::Interrupted {
            TerminalError::Interrupted
        } else {
            TerminalError::Io(err)
        }
    }
}

impl From<dialoguer::Error> for TerminalError {
    fn from(err: dialoguer::Error) -> Self {
        match err {
            dialoguer::Error::IO(io) => TerminalError::from(io),
        }
    }
}

/// Fatal conditions of one commit-message workflow invocation.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Repository(#[from] GitError),

    #[error("Failed to generate commit message: {0}")]
    Generation(#[source] ProviderError),

    #[error("Commit failed: {0}")]
    Commit(#[source] GitError),

    #[error(transparent)]
    Terminal(TerminalError),

    #[error("Interrupted")]
    Interrupted,
}

impl From<TerminalError> for WorkflowError {
    fn from(err: TerminalError) -> Self {
        match err {
            TerminalError::Interrupted => WorkflowError::Interrupted,
            other => WorkflowError::Terminal(other),
        }
    }
}

impl WorkflowError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            WorkflowError::Interrupted => EXIT_INTERRUPTED,
            _ => EXIT_FAILURE,
        }
    }
}

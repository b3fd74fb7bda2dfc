//! git-aicommit - A CLI tool that drafts commit messages for staged changes with an LLM.
//!
//! # Overview
//!
//! git-aicommit reads the staged diff and recent commit messages, asks the
//! configured language model for a commit message, and lets the user commit
//! it, refine it with feedback, or quit.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod terminal;

// Re-export commonly used types
pub use commit::{Outcome, run_workflow};
pub use config::{Config, ProviderKind, ProviderSettings, load_config};
pub use error::{ConfigError, GitError, ProviderError, TerminalError, WorkflowError};
pub use git::{ExcludePatterns, GitRepository, RepositorySnapshot};
pub use llm::{ChatMessage, ChatModel, Provider, provider_from_config, provider_from_settings};
pub use terminal::{ConsoleTerminal, KeyInput, Terminal};

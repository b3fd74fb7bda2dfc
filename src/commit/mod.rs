//! AI-generated commit messages with interactive refinement.

pub mod controller;
pub mod engine;
pub mod executor;
pub mod prompt;
pub mod turn;
pub mod workflow;

pub use controller::{
    Decision, InteractionController, InteractionState, Outcome, RECENT_LOG_COUNT,
    RepositoryContext,
};
pub use engine::ConversationEngine;
pub use executor::CommitExecutor;
pub use prompt::{GenerationRequest, build_messages, clean_message};
pub use turn::{ConversationHistory, ConversationTurn, escape_feedback};
pub use workflow::run_workflow;

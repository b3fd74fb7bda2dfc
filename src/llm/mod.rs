//! Language-model backends and provider selection.

pub mod backends;
pub mod chat;
pub mod registry;

pub use chat::{ChatMessage, ChatModel, Role};
pub use registry::{Provider, provider_from_config, provider_from_settings};

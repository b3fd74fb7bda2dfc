//! Single-request commit message generation.

use tracing::debug;

use crate::commit::prompt::{GenerationRequest, build_messages, clean_message};
use crate::error::ProviderError;
use crate::llm::ChatModel;

/// Turns a generation request into one model call.
pub struct ConversationEngine<'m> {
    model: &'m dyn ChatModel,
}

impl<'m> ConversationEngine<'m> {
    pub fn new(model: &'m dyn ChatModel) -> Self {
        Self { model }
    }

    /// Generate a commit message. Failures are returned as-is; nothing is retried.
    pub async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, ProviderError> {
        let messages = build_messages(request);
        debug!(
            "Requesting commit message: {} messages, diff {} bytes, {} history turns",
            messages.len(),
            request.diff.len(),
            request.history.len()
        );

        let raw = self.model.chat(&messages).await?;
        let message = clean_message(&raw);

        if message.is_empty() {
            return Err(ProviderError::EmptyResponse("model"));
        }

        Ok(message)
    }
}

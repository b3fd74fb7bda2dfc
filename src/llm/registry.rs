//! Provider selection: turns validated settings into a chat model handle.

use std::fmt;

use tracing::debug;

use crate::config::{Config, ProviderSettings};
use crate::error::ConfigError;
use crate::llm::backends::{AnthropicChat, BedrockChat, GoogleGenAiChat, OllamaChat, OpenAiChat};
use crate::llm::chat::ChatModel;

/// The configured chat backend together with its display label.
pub struct Provider {
    pub name: &'static str,
    pub model_name: String,
    pub chat_model: Box<dyn ChatModel>,
}

impl Provider {
    pub fn new(name: &'static str, model_name: impl Into<String>, chat_model: Box<dyn ChatModel>) -> Self {
        Self {
            name,
            model_name: model_name.into(),
            chat_model,
        }
    }

    /// `provider/model`, shown while generating.
    pub fn label(&self) -> String {
        format!("{}/{}", self.name, self.model_name)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

/// Construct the backend selected by `settings`. No network I/O happens here.
pub fn provider_from_settings(settings: &ProviderSettings) -> Provider {
    let name = settings.kind().as_str();
    debug!("Selected provider {} with model {}", name, settings.model());

    let chat_model: Box<dyn ChatModel> = match settings {
        ProviderSettings::AwsBedrock(s) => Box::new(BedrockChat::new(s)),
        ProviderSettings::Anthropic(s) => Box::new(AnthropicChat::new(s)),
        ProviderSettings::GoogleGenAi(s) => Box::new(GoogleGenAiChat::new(s)),
        ProviderSettings::Ollama(s) => Box::new(OllamaChat::new(s)),
        ProviderSettings::OpenAi(s) => Box::new(OpenAiChat::new(s)),
    };

    Provider::new(name, settings.model(), chat_model)
}

/// Validate a raw configuration and construct its provider.
pub fn provider_from_config(config: Config) -> Result<Provider, ConfigError> {
    let settings = config.into_provider_settings()?;
    Ok(provider_from_settings(&settings))
}

//! Ollama chat endpoint for local inference.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::OllamaSettings;
use crate::error::ProviderError;
use crate::llm::chat::{ChatMessage, ChatModel};

use super::{non_empty, send_json};

const PROVIDER: &str = "ollama";

#[derive(Serialize)]
struct OllamaMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: Option<OllamaResponseMessage>,
}

pub struct OllamaChat {
    client: Client,
    base_url: String,
    model: String,
    temperature: f64,
}

impl OllamaChat {
    pub fn new(settings: &OllamaSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for OllamaChat {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let request = OllamaRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let response: OllamaResponse = send_json(PROVIDER, self.client.post(url), &request).await?;

        non_empty(PROVIDER, response.message.map(|m| m.content))
    }
}

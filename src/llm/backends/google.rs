//! Google Generative Language API (Gemini).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GoogleGenAiSettings;
use crate::error::ProviderError;
use crate::llm::chat::{ChatMessage, ChatModel, Role};

use super::{non_empty, send_json, split_system};

const PROVIDER: &str = "google-genai";
const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

pub struct GoogleGenAiChat {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl GoogleGenAiChat {
    pub fn new(settings: &GoogleGenAiSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: GOOGLE_BASE_URL.to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn text_part(text: &str) -> Part {
    Part {
        text: Some(text.to_string()),
    }
}

#[async_trait]
impl ChatModel for GoogleGenAiChat {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let (system, rest) = split_system(messages);

        let request = GenerateContentRequest {
            contents: rest
                .into_iter()
                .map(|m| Content {
                    role: Some(if m.role == Role::Assistant { "model" } else { "user" }),
                    parts: vec![text_part(&m.content)],
                })
                .collect(),
            system_instruction: system.map(|s| Content {
                role: None,
                parts: vec![text_part(&s)],
            }),
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let builder = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key);

        let response: GenerateContentResponse = send_json(PROVIDER, builder, &request).await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            });

        non_empty(PROVIDER, text)
    }
}

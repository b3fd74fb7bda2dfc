//! AWS Bedrock Converse API authenticated with a Bedrock API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::BedrockSettings;
use crate::error::ProviderError;
use crate::llm::chat::{ChatMessage, ChatModel};

use super::{non_empty, send_json, split_system};

const PROVIDER: &str = "aws-bedrock";

/// Environment variable holding the Bedrock API key.
pub const BEDROCK_TOKEN_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";

#[derive(Serialize, Deserialize)]
struct TextBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct ConverseMessage {
    role: &'static str,
    content: Vec<TextBlock>,
}

#[derive(Serialize)]
struct InferenceConfig {
    temperature: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConverseRequest {
    messages: Vec<ConverseMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    system: Vec<TextBlock>,
    inference_config: InferenceConfig,
}

#[derive(Deserialize)]
struct OutputMessage {
    #[serde(default)]
    content: Vec<TextBlock>,
}

#[derive(Deserialize)]
struct ConverseOutput {
    message: Option<OutputMessage>,
}

#[derive(Deserialize)]
struct ConverseResponse {
    output: Option<ConverseOutput>,
}

pub struct BedrockChat {
    client: Client,
    base_url: String,
    model: String,
    temperature: f64,
    token: Option<String>,
}

impl BedrockChat {
    pub fn new(settings: &BedrockSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("https://bedrock-runtime.{}.amazonaws.com", settings.region),
            model: settings.model.clone(),
            temperature: settings.temperature,
            token: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use an explicit API key instead of reading the environment.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn resolve_token(&self) -> Result<String, ProviderError> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        match std::env::var(BEDROCK_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(ProviderError::MissingCredential {
                provider: PROVIDER,
                env_var: BEDROCK_TOKEN_ENV,
            }),
        }
    }

    fn converse_url(&self) -> String {
        format!(
            "{}/model/{}/converse",
            self.base_url.trim_end_matches('/'),
            encode_path_segment(&self.model)
        )
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
///
/// Model ids and inference profile ARNs contain `:` and `/`.
fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn text_block(text: &str) -> TextBlock {
    TextBlock {
        text: Some(text.to_string()),
    }
}

#[async_trait]
impl ChatModel for BedrockChat {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let token = self.resolve_token()?;
        let (system, rest) = split_system(messages);

        let request = ConverseRequest {
            messages: rest
                .into_iter()
                .map(|m| ConverseMessage {
                    role: m.role.as_str(),
                    content: vec![text_block(&m.content)],
                })
                .collect(),
            system: system.iter().map(|s| text_block(s)).collect(),
            inference_config: InferenceConfig {
                temperature: self.temperature,
            },
        };

        let builder = self.client.post(self.converse_url()).bearer_auth(token);
        let response: ConverseResponse = send_json(PROVIDER, builder, &request).await?;

        let text = response.output.and_then(|o| o.message).map(|m| {
            m.content
                .into_iter()
                .filter_map(|b| b.text)
                .collect::<String>()
        });

        non_empty(PROVIDER, text)
    }
}

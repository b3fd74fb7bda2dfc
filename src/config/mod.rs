//! Configuration model: one selected provider plus its settings block.
//!
//! The file is YAML with kebab-case keys. Exactly one provider is selected by
//! the top-level `provider` tag and its block must be present; blocks for
//! other providers are allowed and ignored. Unknown keys are rejected at every
//! level so a typo never silently falls back to a default.

pub mod discovery;
pub mod init;

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

pub use discovery::{CONFIG_FILENAMES, find_config_path};
pub use init::{SAMPLE_CONFIG, init_config};

/// Default Ollama server address.
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Supported language-model backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "aws-bedrock")]
    AwsBedrock,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "google-genai")]
    GoogleGenAi,
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::AwsBedrock => "aws-bedrock",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::GoogleGenAi => "google-genai",
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenAi => "openai",
        }
    }

    pub fn all() -> [ProviderKind; 5] {
        [
            ProviderKind::AwsBedrock,
            ProviderKind::Anthropic,
            ProviderKind::GoogleGenAi,
            ProviderKind::Ollama,
            ProviderKind::OpenAi,
        ]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amazon Bedrock settings. The API key is read from
/// `AWS_BEARER_TOKEN_BEDROCK` when a request is made.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct BedrockSettings {
    pub model: String,
    pub region: String,
    #[serde(default)]
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct AnthropicSettings {
    pub model: String,
    pub api_key: String,
    #[serde(default)]
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct GoogleGenAiSettings {
    pub model: String,
    pub api_key: String,
    #[serde(default)]
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct OllamaSettings {
    pub model: String,
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct OpenAiSettings {
    pub model: String,
    pub api_key: String,
    #[serde(default)]
    pub temperature: f64,
}

fn default_ollama_base_url() -> String {
    DEFAULT_OLLAMA_BASE_URL.to_string()
}

/// Raw configuration file contents.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    pub provider: ProviderKind,
    pub aws_bedrock: Option<BedrockSettings>,
    pub anthropic: Option<AnthropicSettings>,
    pub google_genai: Option<GoogleGenAiSettings>,
    pub ollama: Option<OllamaSettings>,
    pub openai: Option<OpenAiSettings>,
}

/// Validated provider selection: the tag together with its settings.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderSettings {
    AwsBedrock(BedrockSettings),
    Anthropic(AnthropicSettings),
    GoogleGenAi(GoogleGenAiSettings),
    Ollama(OllamaSettings),
    OpenAi(OpenAiSettings),
}

impl ProviderSettings {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderSettings::AwsBedrock(_) => ProviderKind::AwsBedrock,
            ProviderSettings::Anthropic(_) => ProviderKind::Anthropic,
            ProviderSettings::GoogleGenAi(_) => ProviderKind::GoogleGenAi,
            ProviderSettings::Ollama(_) => ProviderKind::Ollama,
            ProviderSettings::OpenAi(_) => ProviderKind::OpenAi,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ProviderSettings::AwsBedrock(s) => &s.model,
            ProviderSettings::Anthropic(s) => &s.model,
            ProviderSettings::GoogleGenAi(s) => &s.model,
            ProviderSettings::Ollama(s) => &s.model,
            ProviderSettings::OpenAi(s) => &s.model,
        }
    }
}

impl Config {
    /// Parse configuration text. `path` is only used in error messages.
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the selected provider's settings block.
    pub fn into_provider_settings(self) -> Result<ProviderSettings, ConfigError> {
        let provider = self.provider;
        let missing = || ConfigError::MissingProviderSettings { provider };

        match provider {
            ProviderKind::AwsBedrock => self
                .aws_bedrock
                .map(ProviderSettings::AwsBedrock)
                .ok_or_else(missing),
            ProviderKind::Anthropic => self
                .anthropic
                .map(ProviderSettings::Anthropic)
                .ok_or_else(missing),
            ProviderKind::GoogleGenAi => self
                .google_genai
                .map(ProviderSettings::GoogleGenAi)
                .ok_or_else(missing),
            ProviderKind::Ollama => self
                .ollama
                .map(ProviderSettings::Ollama)
                .ok_or_else(missing),
            ProviderKind::OpenAi => self
                .openai
                .map(ProviderSettings::OpenAi)
                .ok_or_else(missing),
        }
    }
}

/// Read, parse and validate a configuration file.
pub fn load_config_file(path: &Path) -> Result<ProviderSettings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Config::from_yaml(&text, path)?.into_provider_settings()
}

/// Discover the configuration file upward from `start_dir` and load it.
pub fn load_config(start_dir: &Path) -> Result<ProviderSettings, ConfigError> {
    let path = find_config_path(start_dir).ok_or_else(|| ConfigError::NotFound {
        searched_from: start_dir.to_path_buf(),
    })?;

    debug!("Using configuration file {}", path.display());

    load_config_file(&path)
}

//! `init` subcommand: write a commented sample configuration.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::ConfigError;

use super::discovery::CONFIG_FILENAMES;

/// File name used when creating a new configuration.
const INIT_FILENAME: &str = "aicommit.yml";

/// Sample configuration with every provider commented out.
pub const SAMPLE_CONFIG: &str = r#"# Uncomment and fill in exactly one provider block below.

# Amazon Bedrock (API key read from AWS_BEARER_TOKEN_BEDROCK)
# provider: aws-bedrock
# aws-bedrock:
#   model: "<model>" # Required (e.g. "us.anthropic.claude-sonnet-4-20250514-v1:0")
#   region: "<region>" # Required (e.g. "us-west-2")
#   temperature: 0.0 # Optional (default: 0.0)

# Anthropic
# provider: anthropic
# anthropic:
#   model: "<model>" # Required (e.g. "claude-haiku-4-5-20251001")
#   api-key: "<api-key>" # Required
#   temperature: 0.0 # Optional (default: 0.0)

# Google GenAI
# provider: google-genai
# google-genai:
#   model: "<model>" # Required (e.g. "gemini-2.5-flash")
#   api-key: "<api-key>" # Required
#   temperature: 0.0 # Optional (default: 0.0)

# Ollama
# provider: ollama
# ollama:
#   model: "<model>" # Required
#   base-url: "http://localhost:11434" # Optional (default: http://localhost:11434)
#   temperature: 0.0 # Optional (default: 0.0)

# OpenAI
# provider: openai
# openai:
#   model: "<model>" # Required (e.g. "gpt-4.1")
#   api-key: "<api-key>" # Required
#   temperature: 0.0 # Optional (default: 0.0)
"#;

/// Create `aicommit.yml` in `dir`.
///
/// Fails with [`ConfigError::AlreadyExists`] if any recognised configuration
/// file name is already present in `dir`. The file is written to a temporary
/// file first and moved into place without overwriting, so an interrupted
/// write never leaves a partial configuration behind.
pub fn init_config(dir: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(existing) = CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.exists())
    {
        return Err(ConfigError::AlreadyExists(existing));
    }

    let target = dir.join(INIT_FILENAME);

    let mut tmp = NamedTempFile::new_in(dir).map_err(ConfigError::WriteFailed)?;
    tmp.write_all(SAMPLE_CONFIG.as_bytes())
        .map_err(ConfigError::WriteFailed)?;

    tmp.persist_noclobber(&target).map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            ConfigError::AlreadyExists(target.clone())
        } else {
            ConfigError::WriteFailed(e.error)
        }
    })?;

    Ok(target)
}

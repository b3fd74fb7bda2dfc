//! HTTP clients for the supported chat backends.

pub mod anthropic;
pub mod bedrock;
pub mod google;
pub mod ollama;
pub mod openai;

pub use anthropic::AnthropicChat;
pub use bedrock::BedrockChat;
pub use google::GoogleGenAiChat;
pub use ollama::OllamaChat;
pub use openai::OpenAiChat;

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ProviderError;
use crate::llm::chat::{ChatMessage, Role};

/// Send a JSON request and decode the JSON response.
///
/// Non-success statuses become [`ProviderError::Api`] carrying the response
/// body so the backend's own explanation reaches the user.
pub(crate) async fn send_json<B, R>(
    provider: &'static str,
    request: RequestBuilder,
    body: &B,
) -> Result<R, ProviderError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|source| ProviderError::Request { provider, source })?;

    let status = response.status();
    debug!("{} responded with {}", provider, status);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            provider,
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }

    let text = response
        .text()
        .await
        .map_err(|source| ProviderError::Request { provider, source })?;

    serde_json::from_str::<R>(&text).map_err(|e| ProviderError::InvalidResponse {
        provider,
        detail: format!("{}: {}", e, excerpt(&text)),
    })
}

/// First part of a response body for error messages.
fn excerpt(body: &str) -> &str {
    const MAX_EXCERPT: usize = 200;

    let body = body.trim();
    if body.len() <= MAX_EXCERPT {
        return body;
    }
    let mut end = MAX_EXCERPT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Split system messages from the conversation for APIs that take the
/// system prompt as a separate field. Multiple system messages are joined.
pub(crate) fn split_system(messages: &[ChatMessage]) -> (Option<String>, Vec<&ChatMessage>) {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let rest = messages.iter().filter(|m| m.role != Role::System).collect();

    let system = if system.is_empty() {
        None
    } else {
        Some(system.join("\n\n"))
    };

    (system, rest)
}

/// Treat a missing or blank reply as an error.
pub(crate) fn non_empty(provider: &'static str, text: Option<String>) -> Result<String, ProviderError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(ProviderError::EmptyResponse(provider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_system_separates_roles() {
        let messages = vec![
            ChatMessage::system("rules"),
            ChatMessage::user("diff"),
            ChatMessage::assistant("feat: x"),
        ];

        let (system, rest) = split_system(&messages);
        assert_eq!(system.as_deref(), Some("rules"));
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].role, Role::User);
        assert_eq!(rest[1].role, Role::Assistant);
    }

    #[test]
    fn test_split_system_without_system_message() {
        let messages = vec![ChatMessage::user("hi")];
        let (system, rest) = split_system(&messages);
        assert!(system.is_none());
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        assert_eq!(excerpt("  short  "), "short");

        let long = "é".repeat(150);
        let cut = excerpt(&long);
        assert!(cut.len() <= 200);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    #[tokio::test]
    async fn test_send_json_reports_undecodable_body() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        #[derive(serde::Deserialize, Debug)]
        struct Reply {
            #[allow(dead_code)]
            ok: bool,
        }

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let result: Result<Reply, _> =
            send_json("openai", client.post(server.uri()), &serde_json::json!({})).await;

        match result {
            Err(ProviderError::InvalidResponse { provider, detail }) => {
                assert_eq!(provider, "openai");
                assert!(detail.contains("<html>gateway</html>"));
            }
            other => panic!("expected InvalidResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_non_empty_rejects_blank() {
        assert!(matches!(
            non_empty("openai", Some("  \n".to_string())),
            Err(ProviderError::EmptyResponse("openai"))
        ));
        assert!(matches!(
            non_empty("openai", None),
            Err(ProviderError::EmptyResponse("openai"))
        ));
        assert_eq!(non_empty("openai", Some("ok".to_string())).unwrap(), "ok");
    }
}

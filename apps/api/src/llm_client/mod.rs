//! AI Gateway — the single point of entry for all model-provider calls.
//!
//! ARCHITECTURAL RULE: no other module may call the OpenRouter API directly.
//! All LLM interactions MUST go through this module.
//!
//! One blocking attempt per call: no retry, no backoff, no client-side
//! timeout. The caller owns retry UX; a failed call is surfaced as-is.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod extract;
pub mod handlers;

const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const OPENROUTER_MODELS_URL: &str = "https://openrouter.ai/api/v1/models";

/// Model used when the stored settings carry none.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("provider returned no usable message content")]
    EmptyResponse,
}

/// One chat message in provider wire format.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Parameters for one chat-completion call.
#[derive(Debug, Clone)]
pub struct ChatParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Normalized success result of a chat-completion call.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    /// Free-form model text. May itself be JSON, fenced JSON, or a quoted
    /// string — semantic extraction is the caller's job (see `extract`).
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}

// Raw provider payload. The provider duck-types its responses (an `error`
// object can arrive even on 2xx), so every field is optional here and
// `normalize` folds the shape into explicit variants.
#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<TokenUsage>,
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// An entry of the provider model catalog, as consumed by the UI model picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub context_length: Option<u64>,
    #[serde(default)]
    pub pricing: Option<ModelPricing>,
    #[serde(default)]
    pub architecture: Option<ModelArchitecture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPricing {
    pub prompt: Option<String>,
    pub completion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArchitecture {
    pub modality: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelCatalog {
    data: Vec<ModelInfo>,
}

/// The gateway wraps one API key; construct per request with the effective
/// key from settings (the shared `reqwest::Client` is cheap to clone).
#[derive(Clone)]
pub struct AiGateway {
    client: Client,
    api_key: String,
}

impl AiGateway {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    /// Makes one chat-completion call. Single attempt by design.
    pub async fn call(&self, params: &ChatParams) -> Result<ChatOutcome, GatewayError> {
        let request_body = ChatRequest {
            model: &params.model,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            messages: &params.messages,
        };

        let response = self
            .client
            .post(OPENROUTER_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        let outcome = normalize_chat_response(status, &body)?;
        debug!(
            "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
            outcome.model, outcome.usage.prompt_tokens, outcome.usage.completion_tokens
        );
        Ok(outcome)
    }

    /// Fetches the provider model catalog, filtered to chat-usable models.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
        let response = self
            .client
            .get(OPENROUTER_MODELS_URL)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: provider_error_message(&body),
            });
        }

        let catalog: ModelCatalog = response.json().await?;
        Ok(catalog
            .data
            .into_iter()
            .filter(is_chat_model)
            .collect())
    }
}

/// Folds a raw provider response into explicit variants: success with
/// content, provider error, or empty response. An `error` object wins even
/// on a 2xx status.
fn normalize_chat_response(status: u16, body: &str) -> Result<ChatOutcome, GatewayError> {
    if !(200..300).contains(&status) {
        return Err(GatewayError::Api {
            status,
            message: provider_error_message(body),
        });
    }

    let parsed: ChatResponseBody = match serde_json::from_str(body) {
        Ok(p) => p,
        Err(_) => return Err(GatewayError::EmptyResponse),
    };

    if let Some(err) = parsed.error {
        return Err(GatewayError::Api {
            status,
            message: err.message,
        });
    }

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(GatewayError::EmptyResponse)?;

    Ok(ChatOutcome {
        content,
        model: parsed.model.unwrap_or_default(),
        usage: parsed.usage.unwrap_or_default(),
    })
}

/// Pulls the provider `{error:{message}}` out of a body, falling back to the
/// raw text.
fn provider_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ProviderError,
    }
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

/// Model-picker filter: text modality, not an embedding model.
fn is_chat_model(model: &ModelInfo) -> bool {
    let text_modality = model
        .architecture
        .as_ref()
        .and_then(|a| a.modality.as_deref())
        .map(|m| m.contains("text"))
        .unwrap_or(false);
    text_modality && !model.id.contains("embed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_success_extracts_content_and_usage() {
        let body = r#"{
            "choices": [{"message": {"content": "hello"}}],
            "model": "openai/gpt-4o-mini",
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        let outcome = normalize_chat_response(200, body).unwrap();
        assert_eq!(outcome.content, "hello");
        assert_eq!(outcome.model, "openai/gpt-4o-mini");
        assert_eq!(outcome.usage.total_tokens, 15);
    }

    #[test]
    fn test_normalize_non_2xx_is_api_error_with_provider_message() {
        let body = r#"{"error": {"message": "Invalid API key"}}"#;
        let err = normalize_chat_response(401, body).unwrap_err();
        match err {
            GatewayError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_non_2xx_falls_back_to_raw_body() {
        let err = normalize_chat_response(502, "upstream exploded").unwrap_err();
        match err {
            GatewayError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_error_object_on_2xx_is_api_error() {
        // OpenRouter can return an error envelope with a 200 status.
        let body = r#"{"error": {"message": "Provider overloaded"}}"#;
        let err = normalize_chat_response(200, body).unwrap_err();
        match err {
            GatewayError::Api { status, message } => {
                assert_eq!(status, 200);
                assert_eq!(message, "Provider overloaded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_missing_content_is_empty_response() {
        let body = r#"{"choices": [], "model": "m"}"#;
        assert!(matches!(
            normalize_chat_response(200, body),
            Err(GatewayError::EmptyResponse)
        ));

        let body = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        assert!(matches!(
            normalize_chat_response(200, body),
            Err(GatewayError::EmptyResponse)
        ));
    }

    #[test]
    fn test_normalize_garbage_2xx_body_is_empty_response() {
        assert!(matches!(
            normalize_chat_response(200, "<html>gateway</html>"),
            Err(GatewayError::EmptyResponse)
        ));
    }

    fn model(id: &str, modality: Option<&str>) -> ModelInfo {
        ModelInfo {
            id: id.to_string(),
            name: id.to_string(),
            context_length: Some(8192),
            pricing: None,
            architecture: modality.map(|m| ModelArchitecture {
                modality: Some(m.to_string()),
            }),
        }
    }

    #[test]
    fn test_is_chat_model_filters_embeddings_and_non_text() {
        assert!(is_chat_model(&model("openai/gpt-4o", Some("text->text"))));
        assert!(is_chat_model(&model(
            "anthropic/claude-3.5-sonnet",
            Some("text+image->text")
        )));
        assert!(!is_chat_model(&model(
            "openai/text-embedding-3-small",
            Some("text->text")
        )));
        assert!(!is_chat_model(&model("some/image-gen", Some("image"))));
        assert!(!is_chat_model(&model("no/architecture", None)));
    }
}

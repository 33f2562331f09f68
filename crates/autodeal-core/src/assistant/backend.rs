//! Completion API clients.
//!
//! Supports the Anthropic Messages API and the OpenAI Chat Completions API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AssistantError, ChatMessage, Role};

const ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAi,
}

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub provider: Provider,
    pub api_key: String,
    /// Model name/ID
    pub model: String,
    /// Full URL of the completion endpoint
    pub endpoint: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Request timeout
    pub timeout: Duration,
}

impl AssistantConfig {
    pub fn anthropic(api_key: impl Into<String>) -> Self {
        Self {
            provider: Provider::Anthropic,
            api_key: api_key.into(),
            model: ANTHROPIC_MODEL.to_string(),
            endpoint: ANTHROPIC_ENDPOINT.to_string(),
            max_tokens: 1024,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            provider: Provider::OpenAi,
            api_key: api_key.into(),
            model: OPENAI_MODEL.to_string(),
            endpoint: OPENAI_ENDPOINT.to_string(),
            max_tokens: 1024,
            timeout: Duration::from_secs(30),
        }
    }

    /// `ANTHROPIC_API_KEY` wins over `OPENAI_API_KEY`. `None` when neither is
    /// set to a non-empty value.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let key = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        key("ANTHROPIC_API_KEY")
            .map(Self::anthropic)
            .or_else(|| key("OPENAI_API_KEY").map(Self::openai))
    }
}

/// A hosted text-completion service.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Complete the conversation under the given system prompt.
    async fn complete(&self, system: &str, messages: &[ChatMessage]) -> Result<String, AssistantError>;

    fn model_name(&self) -> &str;
}

fn build_client(config: &AssistantConfig) -> Result<Client, AssistantError> {
    Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| AssistantError::Configuration(format!("Failed to create HTTP client: {e}")))
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AssistantError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AssistantError::Api {
        status: status.as_u16(),
        body,
    })
}

// ---------------------------------------------------------------------------
// Anthropic
// ---------------------------------------------------------------------------

pub struct AnthropicBackend {
    client: Client,
    config: AssistantConfig,
}

impl AnthropicBackend {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    fn request_body<'a>(&'a self, system: &'a str, messages: &'a [ChatMessage]) -> AnthropicRequest<'a> {
        AnthropicRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system,
            messages: messages.iter().map(WireMessage::from).collect(),
        }
    }
}

#[async_trait]
impl CompletionBackend for AnthropicBackend {
    async fn complete(&self, system: &str, messages: &[ChatMessage]) -> Result<String, AssistantError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(system, messages))
            .send()
            .await?;

        let body: AnthropicResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AssistantError::InvalidResponse(e.to_string()))?;

        body.content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| AssistantError::InvalidResponse("empty content".into()))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

pub struct OpenAiBackend {
    client: Client,
    config: AssistantConfig,
}

impl OpenAiBackend {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    fn request_body<'a>(&'a self, system: &'a str, messages: &'a [ChatMessage]) -> OpenAiRequest<'a> {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(WireMessage {
            role: "system",
            content: system,
        });
        wire.extend(messages.iter().map(WireMessage::from));
        OpenAiRequest {
            model: &self.config.model,
            messages: wire,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, system: &str, messages: &[ChatMessage]) -> Result<String, AssistantError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(system, messages))
            .send()
            .await?;

        let body: OpenAiResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AssistantError::InvalidResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AssistantError::InvalidResponse("no choices".into()))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for WireMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: match msg.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: &msg.content,
        }
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conversation() -> Vec<ChatMessage> {
        vec![ChatMessage::user("What is my APR?")]
    }

    #[test]
    fn test_anthropic_key_preferred() {
        let config = AssistantConfig::from_lookup(|name| match name {
            "ANTHROPIC_API_KEY" => Some("sk-ant".into()),
            "OPENAI_API_KEY" => Some("sk-oai".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.provider, Provider::Anthropic);
        assert_eq!(config.model, "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_openai_used_when_anthropic_blank() {
        let config = AssistantConfig::from_lookup(|name| match name {
            "ANTHROPIC_API_KEY" => Some(String::new()),
            "OPENAI_API_KEY" => Some("sk-oai".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.provider, Provider::OpenAi);
    }

    #[test]
    fn test_no_keys_is_offline() {
        assert!(AssistantConfig::from_lookup(|_| None).is_none());
    }

    #[test]
    fn test_anthropic_body_carries_system_separately() {
        let backend = AnthropicBackend::new(AssistantConfig::anthropic("k")).unwrap();
        let messages = conversation();
        let body = serde_json::to_value(backend.request_body("be brief", &messages)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "claude-sonnet-4-20250514",
                "max_tokens": 1024,
                "system": "be brief",
                "messages": [{"role": "user", "content": "What is my APR?"}],
            })
        );
    }

    #[test]
    fn test_openai_body_prepends_system_message() {
        let backend = OpenAiBackend::new(AssistantConfig::openai("k")).unwrap();
        let messages = conversation();
        let body = serde_json::to_value(backend.request_body("be brief", &messages)).unwrap();
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "be brief"}));
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_tokens"], 1024);
    }

    #[test]
    fn test_response_shapes_parse() {
        let anthropic: AnthropicResponse =
            serde_json::from_value(json!({"content": [{"type": "text", "text": "hi"}]})).unwrap();
        assert_eq!(anthropic.content[0].text, "hi");

        let openai: OpenAiResponse = serde_json::from_value(
            json!({"choices": [{"message": {"role": "assistant", "content": "hello"}}]}),
        )
        .unwrap();
        assert_eq!(openai.choices[0].message.content, "hello");
    }
}

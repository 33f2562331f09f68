//! Negotiation assistant proxy.
//!
//! Forwards a conversation, plus a plain-text snapshot of the current
//! calculator figures, to a hosted completion API. The calculators never
//! depend on it: without a credential the assistant answers with canned
//! guidance, and any upstream failure is replaced by a fixed apology.

pub mod backend;
pub mod context;

pub use backend::{AnthropicBackend, AssistantConfig, CompletionBackend, OpenAiBackend, Provider};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Assistant transport errors. Never surfaced to callers of [`Assistant::reply`].
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        AssistantError::Network(err.to_string())
    }
}

pub const SYSTEM_PROMPT: &str = "You are an expert car lease and finance negotiation assistant. You help users understand their car deals and negotiate better terms.

Your expertise includes:
- Lease calculations (money factor, residual value, cap cost, etc.)
- Loan/finance calculations (APR, amortization, etc.)
- Negotiation strategies and tactics
- Common dealer tricks and how to avoid them
- Current market conditions and incentives

When helping users:
1. Be concise and direct - they're likely at a dealership
2. Explain complex terms in simple language
3. If they share numbers, analyze if it's a good deal
4. Suggest specific negotiation tactics when appropriate
5. Flag any red flags or suspicious charges

Common dealer fees to watch for:
- Excessive doc fees (reasonable: $300-500 in most states)
- \"Market adjustment\" or ADM (usually negotiable)
- Unnecessary add-ons (nitrogen in tires, paint protection, etc.)
- Dealer-installed accessories at inflated prices

Keep responses brief and actionable since the user may be on their phone at a dealership.";

/// Reply when no API credential is configured.
pub const FALLBACK_REPLY: &str = "I'm not connected to an AI service yet. To enable the assistant:

1. Get an API key from Anthropic (claude.ai) or OpenAI
2. Export it before starting:
   ANTHROPIC_API_KEY=your_key_here
3. Restart the assistant

In the meantime, here are some tips:
• Money Factor × 2400 = APR equivalent
• Aim for selling price at or below invoice
• Residual values are usually non-negotiable
• Always negotiate the selling price first, then discuss lease terms";

/// Reply when the upstream service fails for any reason.
pub const FAILURE_REPLY: &str = "Sorry, I couldn't process that request. Please try again.";

/// Opening message of a new conversation.
pub const GREETING: &str = "Hi! I'm your lease negotiation assistant. Ask me anything about your deal - I can explain terms, check your numbers, or suggest negotiation strategies.";

// ---------------------------------------------------------------------------
// Conversation types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The conversation so far plus an optional calculator snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Upstream,
    Fallback,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
    pub source: ReplySource,
}

/// System prompt with the calculator snapshot appended when present.
pub fn system_prompt(context: Option<&str>) -> String {
    match context {
        Some(ctx) if !ctx.trim().is_empty() => {
            format!("{SYSTEM_PROMPT}\n\nCurrent calculator values:\n{ctx}")
        }
        _ => SYSTEM_PROMPT.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Proxy
// ---------------------------------------------------------------------------

/// One request per message, no retries.
pub struct Assistant {
    backend: Option<Box<dyn CompletionBackend>>,
}

impl Assistant {
    /// Build from configuration; `None` credentials give an offline assistant.
    pub fn from_config(config: Option<AssistantConfig>) -> Result<Self, AssistantError> {
        let backend: Option<Box<dyn CompletionBackend>> = match config {
            Some(cfg) => Some(match cfg.provider {
                Provider::Anthropic => Box::new(AnthropicBackend::new(cfg)?),
                Provider::OpenAi => Box::new(OpenAiBackend::new(cfg)?),
            }),
            None => None,
        };
        Ok(Self { backend })
    }

    /// Configure from `ANTHROPIC_API_KEY` / `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, AssistantError> {
        Self::from_config(AssistantConfig::from_env())
    }

    pub fn with_backend(backend: Box<dyn CompletionBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn offline() -> Self {
        Self { backend: None }
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    /// Answer the latest message. Never fails.
    pub async fn reply(&self, request: &ChatRequest) -> ChatReply {
        let Some(backend) = &self.backend else {
            return ChatReply {
                content: FALLBACK_REPLY.to_string(),
                source: ReplySource::Fallback,
            };
        };

        let system = system_prompt(request.context.as_deref());
        tracing::debug!(
            model = backend.model_name(),
            messages = request.messages.len(),
            "forwarding chat request"
        );

        match backend.complete(&system, &request.messages).await {
            Ok(content) => ChatReply {
                content,
                source: ReplySource::Upstream,
            },
            Err(e) => {
                tracing::warn!(error = %e, model = backend.model_name(), "chat request failed");
                ChatReply {
                    content: FAILURE_REPLY.to_string(),
                    source: ReplySource::Failure,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    struct StubBackend {
        reply: Result<String, u16>,
        seen_system: Arc<Mutex<Option<String>>>,
    }

    #[async_trait]
    impl CompletionBackend for StubBackend {
        async fn complete(
            &self,
            system: &str,
            _messages: &[ChatMessage],
        ) -> Result<String, AssistantError> {
            *self.seen_system.lock().unwrap() = Some(system.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(AssistantError::Api {
                    status: *status,
                    body: "overloaded".into(),
                }),
            }
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    fn request() -> ChatRequest {
        ChatRequest {
            messages: vec![
                ChatMessage::assistant(GREETING),
                ChatMessage::user("Is 0.0021 a good money factor?"),
            ],
            context: Some("Monthly payment: $618.53".into()),
        }
    }

    #[tokio::test]
    async fn test_offline_returns_fallback() {
        let reply = Assistant::offline().reply(&request()).await;
        assert_eq!(reply.source, ReplySource::Fallback);
        assert!(reply.content.contains("Money Factor × 2400"));
    }

    #[tokio::test]
    async fn test_upstream_reply_passed_through() {
        let seen_system = Arc::new(Mutex::new(None));
        let assistant = Assistant::with_backend(Box::new(StubBackend {
            reply: Ok("That's about 5% APR.".into()),
            seen_system: Arc::clone(&seen_system),
        }));
        let reply = assistant.reply(&request()).await;
        assert_eq!(
            reply,
            ChatReply {
                content: "That's about 5% APR.".into(),
                source: ReplySource::Upstream,
            }
        );
        let system = seen_system.lock().unwrap().clone().unwrap();
        assert!(system.ends_with("Monthly payment: $618.53"));
    }

    #[tokio::test]
    async fn test_upstream_failure_recovered() {
        let assistant = Assistant::with_backend(Box::new(StubBackend {
            reply: Err(529),
            seen_system: Arc::new(Mutex::new(None)),
        }));
        let reply = assistant.reply(&request()).await;
        assert_eq!(reply.source, ReplySource::Failure);
        assert_eq!(reply.content, FAILURE_REPLY);
    }

    #[test]
    fn test_system_prompt_appends_context() {
        let prompt = system_prompt(Some("Monthly payment: $618.53"));
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.ends_with("Current calculator values:\nMonthly payment: $618.53"));
        assert_eq!(system_prompt(None), SYSTEM_PROMPT);
        assert_eq!(system_prompt(Some("  ")), SYSTEM_PROMPT);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}

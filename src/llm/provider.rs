//! Provider abstraction shared by the OpenAI and Anthropic adapters.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;

/// Supported text-generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A system + user message pair with sampling limits.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A chat-completion backend.
///
/// This abstraction allows mocking the HTTP providers in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Which provider this adapter talks to.
    fn provider(&self) -> Provider;

    /// Send the prompt and return the generated text, trimmed.
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ProviderError>;
}

/// Run a completion bounded by `deadline` and aborted by `cancel`.
pub async fn complete_within(
    generator: &dyn TextGenerator,
    prompt: &ChatPrompt,
    deadline: Duration,
    cancel: &CancellationToken,
) -> Result<String, ProviderError> {
    let provider = generator.provider();

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ProviderError::Cancelled(provider)),
        result = tokio::time::timeout(deadline, generator.complete(prompt)) => match result {
            Ok(inner) => inner,
            Err(_) => Err(ProviderError::Timeout {
                provider,
                secs: deadline.as_secs(),
            }),
        },
    }
}

/// Error envelope both providers use: `{"error": {"message", "type", "code"}}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Map a non-2xx provider response to a typed error.
///
/// 429 with code `insufficient_quota` is a quota failure; 401/403 an auth
/// failure; code `context_length_exceeded` a token-limit failure. Anything
/// else keeps its status and the provider's message.
pub fn classify_error_response(provider: Provider, status: u16, body: &str) -> ProviderError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .unwrap_or_default();

    let message = detail
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "Unknown error".to_string());
    let code = detail.code.or(detail.kind).unwrap_or_default();

    match (status, code.as_str()) {
        (429, "insufficient_quota") => ProviderError::QuotaExceeded { provider, message },
        (_, "context_length_exceeded") => ProviderError::TokenLimitExceeded { provider, message },
        (401 | 403, _) => ProviderError::Auth {
            provider,
            status,
            message,
        },
        _ => ProviderError::Http {
            provider,
            status,
            message,
        },
    }
}

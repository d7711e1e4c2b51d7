//! Generation backend selection and fallback orchestration.
//!
//! Tries the primary provider, moves to the secondary provider only when the
//! primary ran out of quota, and otherwise degrades to the rule-based
//! changelog. No path returns an error: the worst outcome is a rule-based
//! document with a fallback reason attached.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::changelog::generate_basic_changelog;
use crate::config::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, GenerationConfig,
};
use crate::error::ProviderError;
use crate::git::{Commit, ProcessedCommit};

use super::anthropic::AnthropicClient;
use super::openai::OpenAiClient;
use super::prompt::build_chat_prompt;
use super::provider::{ChatPrompt, Provider, TextGenerator, complete_within};

pub const REASON_NO_API_KEY: &str = "No AI API key configured";
pub const REASON_BOTH_FAILED: &str = "Both providers failed";
pub const REASON_QUOTA: &str = "AI API quota exceeded";
pub const REASON_TOKEN_LIMIT: &str =
    "Token limit exceeded - too many commits. Try selecting fewer commits.";
pub const REASON_BAD_KEY: &str = "AI API key not configured or invalid";
pub const REASON_TIMEOUT: &str = "AI generation timed out";
pub const REASON_CANCELLED: &str = "AI generation cancelled";
pub const REASON_GENERIC: &str = "AI generation failed";

/// Outcome of backend selection, before post-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub ai_used: bool,
    /// Provider that produced `text`, if any.
    pub provider: Option<Provider>,
    pub fallback_reason: Option<String>,
}

impl Generation {
    fn from_ai(text: String, provider: Provider) -> Self {
        Self {
            text,
            ai_used: true,
            provider: Some(provider),
            fallback_reason: None,
        }
    }

    fn rule_based(commits: &[Commit], version_label: &str, reason: &str) -> Self {
        Self {
            text: generate_basic_changelog(commits, version_label),
            ai_used: false,
            provider: None,
            fallback_reason: Some(reason.to_string()),
        }
    }
}

/// Human-readable fallback reason for a provider failure.
pub fn fallback_reason_for(error: &ProviderError) -> &'static str {
    match error {
        ProviderError::QuotaExceeded { .. } => REASON_QUOTA,
        ProviderError::TokenLimitExceeded { .. } => REASON_TOKEN_LIMIT,
        ProviderError::Auth { .. } | ProviderError::NotConfigured(_) => REASON_BAD_KEY,
        ProviderError::Timeout { .. } => REASON_TIMEOUT,
        ProviderError::Cancelled(_) => REASON_CANCELLED,
        ProviderError::Http { .. }
        | ProviderError::Transport { .. }
        | ProviderError::EmptyResponse(_) => REASON_GENERIC,
    }
}

/// Primary/secondary provider pair with generation limits.
pub struct ChangelogGenerator {
    primary: Option<Box<dyn TextGenerator>>,
    secondary: Option<Box<dyn TextGenerator>>,
    timeout: Duration,
    max_tokens: u32,
    temperature: f32,
}

impl Default for ChangelogGenerator {
    /// A generator with no providers: always rule-based.
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl ChangelogGenerator {
    pub fn new(
        primary: Option<Box<dyn TextGenerator>>,
        secondary: Option<Box<dyn TextGenerator>>,
    ) -> Self {
        Self {
            primary,
            secondary,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// OpenAI as primary and Anthropic as secondary, each only if configured.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, ProviderError> {
        let primary = match &config.openai {
            Some(openai) => Some(Box::new(OpenAiClient::new(openai, config.timeout)?)
                as Box<dyn TextGenerator>),
            None => None,
        };
        let secondary = match &config.anthropic {
            Some(anthropic) => Some(Box::new(AnthropicClient::new(anthropic, config.timeout)?)
                as Box<dyn TextGenerator>),
            None => None,
        };

        Ok(Self::new(primary, secondary)
            .with_timeout(config.timeout)
            .with_limits(config.max_tokens, config.temperature))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_limits(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn has_provider(&self) -> bool {
        self.primary.is_some() || self.secondary.is_some()
    }

    /// Produce changelog text for the given commits.
    ///
    /// `processed` feeds the AI prompt; `commits` feeds the rule-based
    /// fallback. Both are expected to be truncated already.
    pub async fn generate(
        &self,
        project_name: &str,
        version_label: &str,
        processed: &[ProcessedCommit],
        commits: &[Commit],
        cancel: &CancellationToken,
    ) -> Generation {
        if !self.has_provider() {
            info!("No AI provider configured, generating rule-based changelog");
            return Generation::rule_based(commits, version_label, REASON_NO_API_KEY);
        }

        let prompt = build_chat_prompt(
            project_name,
            version_label,
            processed,
            self.max_tokens,
            self.temperature,
        );

        match (&self.primary, &self.secondary) {
            (Some(primary), secondary) => match self.call(primary.as_ref(), &prompt, cancel).await {
                Ok(text) => Generation::from_ai(text, primary.provider()),
                Err(primary_error) => match secondary {
                    Some(secondary) if primary_error.is_quota_exceeded() => {
                        info!(
                            "{} quota exceeded, trying {}",
                            primary.provider(),
                            secondary.provider()
                        );
                        match self.call(secondary.as_ref(), &prompt, cancel).await {
                            Ok(text) => Generation::from_ai(text, secondary.provider()),
                            Err(secondary_error) => {
                                warn!(
                                    "AI generation failed, falling back to basic changelog: {}; {}",
                                    primary_error, secondary_error
                                );
                                Generation::rule_based(commits, version_label, REASON_BOTH_FAILED)
                            }
                        }
                    }
                    _ => {
                        warn!(
                            "AI generation failed, falling back to basic changelog: {}",
                            primary_error
                        );
                        Generation::rule_based(
                            commits,
                            version_label,
                            fallback_reason_for(&primary_error),
                        )
                    }
                },
            },
            (None, Some(secondary)) => match self.call(secondary.as_ref(), &prompt, cancel).await
            {
                Ok(text) => Generation::from_ai(text, secondary.provider()),
                Err(e) => {
                    warn!("AI generation failed, falling back to basic changelog: {}", e);
                    Generation::rule_based(commits, version_label, fallback_reason_for(&e))
                }
            },
            (None, None) => Generation::rule_based(commits, version_label, REASON_NO_API_KEY),
        }
    }

    async fn call(
        &self,
        generator: &dyn TextGenerator,
        prompt: &ChatPrompt,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        complete_within(generator, prompt, self.timeout, cancel).await
    }
}

//! Explicit configuration for generation and GitHub access.
//!
//! The environment is read once, at startup, by the `from_env` constructors.
//! Everything downstream receives these values as plain arguments.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;

/// Default timeout for a single provider request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Upper bound on generated output tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

/// Sampling temperature sent to both providers.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
const OPENAI_MODEL_VAR: &str = "OPENAI_MODEL";
const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";
const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";
const ANTHROPIC_MODEL_VAR: &str = "ANTHROPIC_MODEL";
const ANTHROPIC_BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
const TIMEOUT_ENV_VAR: &str = "CHANGELOGY_LLM_TIMEOUT";

/// Credentials and endpoint for one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// Everything the backend selector needs to decide which branch runs.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Primary provider (OpenAI).
    pub openai: Option<ProviderConfig>,
    /// Secondary provider (Anthropic).
    pub anthropic: Option<ProviderConfig>,
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            openai: None,
            anthropic: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GenerationConfig {
    /// Build configuration from process environment variables.
    ///
    /// Empty API keys count as absent. An invalid timeout logs a warning and
    /// keeps the default rather than failing startup.
    pub fn from_env() -> Self {
        let openai = non_empty_var(OPENAI_KEY_VAR).map(|api_key| ProviderConfig {
            api_key,
            model: non_empty_var(OPENAI_MODEL_VAR).unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into()),
            base_url: non_empty_var(OPENAI_BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
        });

        let anthropic = non_empty_var(ANTHROPIC_KEY_VAR).map(|api_key| ProviderConfig {
            api_key,
            model: non_empty_var(ANTHROPIC_MODEL_VAR)
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.into()),
            base_url: non_empty_var(ANTHROPIC_BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.into()),
        });

        let timeout = match non_empty_var(TIMEOUT_ENV_VAR) {
            Some(raw) => parse_timeout(&raw).unwrap_or_else(|e| {
                warn!("{}, using default {}s", e, DEFAULT_TIMEOUT_SECS);
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Self {
            openai,
            anthropic,
            timeout,
            ..Self::default()
        }
    }

    /// True when at least one provider credential is present.
    pub fn has_any_provider(&self) -> bool {
        self.openai.is_some() || self.anthropic.is_some()
    }
}

/// GitHub access for commit fetching.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GitHubConfig {
    pub token: Option<String>,
}

impl GitHubConfig {
    /// Reads `GITHUB_TOKEN`, then `GH_TOKEN`.
    pub fn from_env() -> Self {
        Self {
            token: non_empty_var("GITHUB_TOKEN").or_else(|| non_empty_var("GH_TOKEN")),
        }
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            var: TIMEOUT_ENV_VAR,
            value: raw.to_string(),
        }),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

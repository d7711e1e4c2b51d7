//! Error types for changelogy modules using thiserror.

use thiserror::Error;

use crate::llm::Provider;

/// Errors from validating an inbound generation request.
///
/// These are the only errors a caller of the pipeline ever sees; provider
/// failures are absorbed into the rule-based fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Commits are required")]
    MissingCommits,

    #[error("Project name and version label are required")]
    MissingProjectOrVersion,

    #[error("Version label must be at most {max} characters (got {len})")]
    VersionLabelTooLong { len: usize, max: usize },
}

/// Failures from a single text-generation provider call.
///
/// Closed set of kinds so the backend selector can branch on the variant
/// instead of inspecting message text.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} API key is not configured")]
    NotConfigured(Provider),

    #[error("{provider} quota exceeded: {message}")]
    QuotaExceeded { provider: Provider, message: String },

    #[error("{provider} rejected the API key (HTTP {status}): {message}")]
    Auth {
        provider: Provider,
        status: u16,
        message: String,
    },

    #[error("{provider} token limit exceeded: {message}")]
    TokenLimitExceeded { provider: Provider, message: String },

    #[error("{provider} API error ({status}): {message}")]
    Http {
        provider: Provider,
        status: u16,
        message: String,
    },

    #[error("{provider} request failed: {source}")]
    Transport {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request timed out after {secs} seconds")]
    Timeout { provider: Provider, secs: u64 },

    #[error("{0} request was cancelled")]
    Cancelled(Provider),

    #[error("No content received from {0}")]
    EmptyResponse(Provider),
}

impl ProviderError {
    /// Provider the failure originated from.
    pub fn provider(&self) -> Provider {
        match self {
            ProviderError::NotConfigured(provider)
            | ProviderError::Cancelled(provider)
            | ProviderError::EmptyResponse(provider) => *provider,
            ProviderError::QuotaExceeded { provider, .. }
            | ProviderError::Auth { provider, .. }
            | ProviderError::TokenLimitExceeded { provider, .. }
            | ProviderError::Http { provider, .. }
            | ProviderError::Transport { provider, .. }
            | ProviderError::Timeout { provider, .. } => *provider,
        }
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, ProviderError::QuotaExceeded { .. })
    }
}

/// Errors from reading configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: expected a positive number of seconds")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Errors from local git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to resolve revision '{0}': {1}")]
    RevisionNotFound(String, #[source] git2::Error),

    #[error("Failed to read commit: {0}")]
    ParseCommit(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),
}

/// Errors from GitHub API operations.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "GitHub authentication failed: no token found. Set GITHUB_TOKEN or GH_TOKEN environment variable"
    )]
    AuthenticationFailed,

    #[error("Failed to fetch commits: {0}")]
    FetchCommits(#[source] Box<octocrab::Error>),

    #[error("Rate limited by GitHub API")]
    RateLimited,

    #[error("Repository not found: {owner}/{repo}")]
    RepositoryNotFound { owner: String, repo: String },

    #[error("Invalid repository '{0}': expected owner/repo")]
    InvalidRepository(String),
}

/// Errors from changelog file operations.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read changelog: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to write changelog: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to create backup: {0}")]
    BackupFailed(#[source] std::io::Error),

    #[error("Changelog content is empty")]
    EmptyContent,
}

//! changelogy - Turns raw commit lists into release-ready Markdown changelogs.
//!
//! # Overview
//!
//! Commits are normalized, rendered into a prompt, and sent to OpenAI. When
//! OpenAI reports an exhausted quota the request moves to Anthropic, and when
//! no model can answer a keyword categorizer writes the changelog instead.
//! Every result passes through the same Markdown post-processor.

pub mod changelog;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod llm;
pub mod pipeline;
pub mod slug;

// Re-export commonly used types
pub use changelog::{ChangelogCategory, generate_basic_changelog, post_process};
pub use config::{GenerationConfig, GitHubConfig};
pub use error::{ChangelogError, ConfigError, GitError, GitHubError, ProviderError, RequestError};
pub use git::{Commit, CommitAuthor, ProcessedCommit};
pub use llm::{ChangelogGenerator, Generation, Provider};
pub use pipeline::{ChangelogDraft, GenerateRequest, generate_changelog};

//! End-to-end changelog generation for one request.
//!
//! `Start -> Normalize -> Format -> select backend -> PostProcess -> Done`.
//! Only request validation can fail; every other path produces a draft.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::changelog::post_process;
use crate::error::RequestError;
use crate::git::{Commit, MAX_COMMITS, process_commits, truncate_commits};
use crate::llm::ChangelogGenerator;

/// Longest accepted version label, in characters.
pub const MAX_VERSION_LABEL_LEN: usize = 60;

/// Inbound generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub version_label: String,
}

impl GenerateRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.commits.is_empty() {
            return Err(RequestError::MissingCommits);
        }

        let version_label = self.version_label.trim();
        if self.project_name.trim().is_empty() || version_label.is_empty() {
            return Err(RequestError::MissingProjectOrVersion);
        }

        let len = version_label.chars().count();
        if len > MAX_VERSION_LABEL_LEN {
            return Err(RequestError::VersionLabelTooLong {
                len,
                max: MAX_VERSION_LABEL_LEN,
            });
        }

        Ok(())
    }
}

/// Generated Markdown plus how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogDraft {
    pub changelog: String,
    pub ai_used: bool,
    /// Why the rule-based generator was used; `None` whenever `ai_used`.
    pub fallback_reason: Option<String>,
}

/// Validate the request and produce a changelog draft.
pub async fn generate_changelog(
    request: &GenerateRequest,
    generator: &ChangelogGenerator,
    cancel: &CancellationToken,
) -> Result<ChangelogDraft, RequestError> {
    request.validate()?;

    if request.commits.len() > MAX_COMMITS {
        warn!(
            "Too many commits ({}), limiting to {}",
            request.commits.len(),
            MAX_COMMITS
        );
    }

    let commits = truncate_commits(&request.commits);
    let processed = process_commits(commits);
    let project_name = request.project_name.trim();
    let version_label = request.version_label.trim();

    let generation = generator
        .generate(project_name, version_label, &processed, commits, cancel)
        .await;

    match generation.provider {
        Some(provider) => info!(
            "Changelog for {} {} generated by {}",
            project_name, version_label, provider
        ),
        None => info!(
            "Changelog for {} {} generated by rules ({})",
            project_name,
            version_label,
            generation.fallback_reason.as_deref().unwrap_or("no reason")
        ),
    }

    Ok(ChangelogDraft {
        changelog: post_process(&generation.text, version_label),
        ai_used: generation.ai_used,
        fallback_reason: if generation.ai_used {
            None
        } else {
            generation.fallback_reason
        },
    })
}

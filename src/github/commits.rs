//! Commit fetching via octocrab.

use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GitHubError;
use crate::git::{Commit, CommitAuthor};

/// Branch used when the repository lookup does not report one.
pub const FALLBACK_BRANCH: &str = "main";

/// GitHub's page-size ceiling for the commits endpoint.
pub const MAX_PER_PAGE: u8 = 100;

/// Commits of one branch, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitListing {
    pub branch: String,
    pub commits: Vec<Commit>,
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    #[serde(default)]
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitItem {
    sha: String,
    #[serde(default)]
    html_url: Option<String>,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    author: Option<GitActor>,
    #[serde(default)]
    committer: Option<GitActor>,
}

#[derive(Debug, Deserialize)]
struct GitActor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Serialize)]
struct ListParams<'a> {
    sha: &'a str,
    per_page: u8,
}

impl From<CommitItem> for Commit {
    fn from(item: CommitItem) -> Self {
        let author = item.commit.author.unwrap_or(GitActor {
            name: None,
            email: None,
            date: None,
        });

        Commit {
            sha: item.sha,
            message: item.commit.message,
            author: CommitAuthor {
                name: author.name.unwrap_or_default(),
                email: author.email.unwrap_or_default(),
                date: author.date.unwrap_or_default(),
            },
            url: item.html_url.unwrap_or_default(),
            date: item
                .commit
                .committer
                .and_then(|c| c.date)
                .unwrap_or_default(),
        }
    }
}

/// Fetch commits of `branch` (or the default branch) using a token.
///
/// This is the main entry point that constructs the octocrab client.
pub async fn fetch_commits(
    token: &str,
    owner: &str,
    repo: &str,
    branch: Option<&str>,
    per_page: u8,
) -> Result<CommitListing, GitHubError> {
    let octocrab = Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|e| GitHubError::FetchCommits(Box::new(e)))?;

    fetch_commits_with_client(&octocrab, owner, repo, branch, per_page).await
}

/// Fetch commits using a pre-configured octocrab client.
///
/// This allows dependency injection for testing with mock servers.
pub async fn fetch_commits_with_client(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    branch: Option<&str>,
    per_page: u8,
) -> Result<CommitListing, GitHubError> {
    let branch = match branch.map(str::trim).filter(|b| !b.is_empty()) {
        Some(branch) => branch.to_string(),
        None => resolve_default_branch(octocrab, owner, repo).await,
    };

    let params = ListParams {
        sha: &branch,
        per_page: per_page.clamp(1, MAX_PER_PAGE),
    };

    let items: Vec<CommitItem> = octocrab
        .get(format!("/repos/{}/{}/commits", owner, repo), Some(&params))
        .await
        .map_err(|e| classify_octocrab_error(e, owner, repo))?;

    debug!("Fetched {} commits from {}/{}@{}", items.len(), owner, repo, branch);

    Ok(CommitListing {
        branch,
        commits: items.into_iter().map(Commit::from).collect(),
    })
}

/// The repository's default branch, or `main` if it cannot be determined.
pub async fn resolve_default_branch(octocrab: &Octocrab, owner: &str, repo: &str) -> String {
    let result: Result<RepoInfo, _> = octocrab
        .get(format!("/repos/{}/{}", owner, repo), None::<&()>)
        .await;

    match result {
        Ok(info) => info
            .default_branch
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_BRANCH.to_string()),
        Err(e) => {
            debug!(
                "Could not resolve default branch of {}/{}: {}; using {}",
                owner, repo, e, FALLBACK_BRANCH
            );
            FALLBACK_BRANCH.to_string()
        }
    }
}

fn classify_octocrab_error(e: octocrab::Error, owner: &str, repo: &str) -> GitHubError {
    // Check both Display and Debug output to handle different octocrab error formats
    let text = format!("{} {:?}", e, e).to_lowercase();

    if text.contains("rate limit") {
        return GitHubError::RateLimited;
    }
    if text.contains("not found") {
        return GitHubError::RepositoryNotFound {
            owner: owner.to_string(),
            repo: repo.to_string(),
        };
    }
    GitHubError::FetchCommits(Box::new(e))
}

/// Split `owner/repo`, a GitHub HTTPS URL, or an SSH remote into its parts.
pub fn parse_repository(input: &str) -> Result<(String, String), GitHubError> {
    let trimmed = input.trim();

    let path = if let Some(path) = trimmed.strip_prefix("git@github.com:") {
        path
    } else if let Some((_, path)) = trimmed.split_once("github.com/") {
        path
    } else {
        trimmed
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');

    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(GitHubError::InvalidRepository(input.to_string())),
    }
}

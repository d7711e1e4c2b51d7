//! Commit records and reading them from a local repository.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use git2::{Repository, Sort};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::GitError;

/// Author block of a commit as the version-control host reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
}

/// A raw commit as received from the caller.
///
/// Every field tolerates being missing or `null`, so partially filled
/// records degrade to empty values instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sha: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: CommitAuthor,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
}

impl Commit {
    /// First line of the message, trimmed.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }

    /// Commit timestamp, preferring the top-level date over the author date.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        [self.date.as_str(), self.author.date.as_str()]
            .into_iter()
            .filter(|d| !d.trim().is_empty())
            .find_map(|d| DateTime::parse_from_rfc3339(d.trim()).ok())
            .map(|d| d.with_timezone(&Utc))
    }

    /// Create a Commit from a git2 commit.
    pub fn from_git2_commit(commit: &git2::Commit) -> Self {
        let author = commit.author();
        let author_time = to_rfc3339(author.when().seconds());
        let committer_time = to_rfc3339(commit.committer().when().seconds());

        Self {
            sha: commit.id().to_string(),
            message: commit.message().unwrap_or("").to_string(),
            author: CommitAuthor {
                name: author.name().unwrap_or("").to_string(),
                email: author.email().unwrap_or("").to_string(),
                date: author_time,
            },
            url: String::new(),
            date: committer_time,
        }
    }
}

fn to_rfc3339(seconds: i64) -> String {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_default()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read up to `limit` commits reachable from `rev`, newest first.
pub fn read_local_commits(
    path: &Path,
    rev: Option<&str>,
    limit: usize,
) -> Result<Vec<Commit>, GitError> {
    let repo = Repository::open(path).map_err(GitError::OpenRepository)?;
    read_commits(&repo, rev.unwrap_or("HEAD"), limit)
}

/// Walk an open repository from `rev`, newest first.
pub fn read_commits(repo: &Repository, rev: &str, limit: usize) -> Result<Vec<Commit>, GitError> {
    let start = repo
        .revparse_single(rev)
        .and_then(|obj| obj.peel_to_commit())
        .map_err(|e| GitError::RevisionNotFound(rev.to_string(), e))?;

    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk
        .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
        .map_err(GitError::RevwalkError)?;
    revwalk.push(start.id()).map_err(GitError::RevwalkError)?;

    let mut commits = Vec::new();

    for oid_result in revwalk.take(limit) {
        let oid = oid_result.map_err(GitError::RevwalkError)?;
        let commit = repo.find_commit(oid).map_err(GitError::ParseCommit)?;
        commits.push(Commit::from_git2_commit(&commit));
    }

    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_request_shape() {
        let json = r#"{
            "sha": "abc123",
            "message": "feat: add export\n\nLonger body",
            "author": {"name": "Ada", "email": "ada@example.com", "date": "2024-03-05T10:00:00Z"},
            "url": "https://github.com/o/r/commit/abc123",
            "date": "2024-03-05T10:00:00Z"
        }"#;

        let commit: Commit = serde_json::from_str(json).unwrap();
        assert_eq!(commit.sha, "abc123");
        assert_eq!(commit.author.name, "Ada");
        assert_eq!(commit.subject(), "feat: add export");
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let commit: Commit = serde_json::from_str(r#"{"message": "fix", "author": null}"#).unwrap();
        assert_eq!(commit.message, "fix");
        assert_eq!(commit.author, CommitAuthor::default());
        assert!(commit.date.is_empty());
    }

    #[test]
    fn test_timestamp_prefers_top_level_date() {
        let commit = Commit {
            date: "2024-01-02T00:00:00Z".to_string(),
            author: CommitAuthor {
                date: "2023-12-31T00:00:00Z".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            commit.timestamp(),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_timestamp_malformed_is_none() {
        let commit = Commit {
            date: "yesterday".to_string(),
            ..Default::default()
        };
        assert_eq!(commit.timestamp(), None);
    }

    #[test]
    fn test_subject_of_empty_message() {
        assert_eq!(Commit::default().subject(), "");
    }
}

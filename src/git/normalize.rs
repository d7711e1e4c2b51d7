//! Commit normalization ahead of prompt construction.
//!
//! Splits each raw message into a title and a short, noise-free body, and
//! attaches an author/date context line.

use serde::Serialize;

use super::commits::Commit;

/// Maximum commits sent to generation per request.
pub const MAX_COMMITS: usize = 50;

/// Maximum body lines kept per commit.
pub const MAX_DESCRIPTION_LINES: usize = 5;

/// Body lines starting with these (case-insensitive) are dropped.
const NOISE_PREFIXES: [&str; 3] = ["merge", "co-authored-by", "signed-off-by"];

/// A commit reduced to what the prompt needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessedCommit {
    pub title: String,
    pub description: String,
    pub context: String,
}

/// Keep the first `MAX_COMMITS` commits, preserving order.
pub fn truncate_commits(commits: &[Commit]) -> &[Commit] {
    &commits[..commits.len().min(MAX_COMMITS)]
}

/// Normalize a single commit.
pub fn process_commit(commit: &Commit) -> ProcessedCommit {
    let mut lines = commit.message.lines();
    let title = lines.next().unwrap_or("").trim().to_string();

    let description = lines
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_noise_line(line))
        .take(MAX_DESCRIPTION_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    ProcessedCommit {
        title,
        description,
        context: build_context(commit),
    }
}

/// Truncate to `MAX_COMMITS` and normalize each commit in order.
pub fn process_commits(commits: &[Commit]) -> Vec<ProcessedCommit> {
    truncate_commits(commits)
        .iter()
        .map(process_commit)
        .collect()
}

fn is_noise_line(trimmed: &str) -> bool {
    let lower = trimmed.to_lowercase();
    NOISE_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

fn build_context(commit: &Commit) -> String {
    let mut parts = Vec::with_capacity(2);

    let name = commit.author.name.trim();
    if !name.is_empty() {
        parts.push(format!("Author: {}", name));
    }

    if let Some(timestamp) = commit.timestamp() {
        parts.push(format!("Date: {}", timestamp.format("%b %-d, %Y")));
    }

    parts.join(" | ")
}

//! GitHub API integration.

pub mod commits;

pub use commits::{
    CommitListing, fetch_commits, fetch_commits_with_client, parse_repository,
    resolve_default_branch,
};

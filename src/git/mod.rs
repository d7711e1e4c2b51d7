//! Commit records, local repository access, and normalization.

pub mod commits;
pub mod normalize;

pub use commits::{Commit, CommitAuthor, read_commits, read_local_commits};
pub use normalize::{
    MAX_COMMITS, ProcessedCommit, process_commit, process_commits, truncate_commits,
};

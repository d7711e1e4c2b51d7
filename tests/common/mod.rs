//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::time::Duration;

use changelogy::config::ProviderConfig;
use changelogy::{Commit, CommitAuthor, GenerateRequest, GenerationConfig};
use git2::{Oid, Repository, Signature};
use serde_json::{Value, json};

/// Create a temporary directory for test output.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// A commit as the request body would carry it.
pub fn commit(message: &str) -> Commit {
    Commit {
        sha: format!("{:040x}", message.len()),
        message: message.to_string(),
        author: CommitAuthor {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            date: "2024-03-05T10:00:00Z".to_string(),
        },
        url: String::new(),
        date: "2024-03-05T10:00:00Z".to_string(),
    }
}

/// A valid request for project `Acme`, version `2.1.0`.
pub fn request(messages: &[&str]) -> GenerateRequest {
    GenerateRequest {
        commits: messages.iter().map(|m| commit(m)).collect(),
        project_name: "Acme".to_string(),
        version_label: "2.1.0".to_string(),
    }
}

/// Provider settings pointing at a mock server.
pub fn provider_config(base_url: &str, model: &str) -> ProviderConfig {
    ProviderConfig {
        api_key: "test-key".to_string(),
        model: model.to_string(),
        base_url: base_url.to_string(),
    }
}

/// Generation settings with optional mock OpenAI and Anthropic endpoints.
pub fn generation_config(openai: Option<&str>, anthropic: Option<&str>) -> GenerationConfig {
    GenerationConfig {
        openai: openai.map(|url| provider_config(url, "gpt-test")),
        anthropic: anthropic.map(|url| provider_config(url, "claude-test")),
        timeout: Duration::from_secs(5),
        ..GenerationConfig::default()
    }
}

/// Successful chat-completions body.
pub fn openai_reply(text: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}
        ]
    })
}

/// Successful messages body.
pub fn anthropic_reply(text: &str) -> Value {
    json!({
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn"
    })
}

/// OpenAI-shaped error body.
pub fn openai_error(message: &str, code: &str) -> Value {
    json!({
        "error": {"message": message, "type": code, "code": code}
    })
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    /// Create a commit with the given message. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        self.commit_as("Test User", "test@example.com", message)
    }

    /// Create a commit authored by someone specific.
    pub fn commit_as(&self, name: &str, email: &str, message: &str) -> Oid {
        let sig = Signature::now(name, email).expect("Failed to create signature");

        // Create or update a file to have something to commit
        let file_path = self.dir.path().join("test.txt");
        let content = format!(
            "{}\n{}",
            message,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );
        std::fs::write(&file_path, content).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_path(std::path::Path::new("test.txt"))
            .expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a branch pointing to the given OID.
    pub fn branch(&self, name: &str, oid: Oid) {
        let commit = self.repo.find_commit(oid).expect("Failed to find commit");
        self.repo
            .branch(name, &commit, false)
            .expect("Failed to create branch");
    }
}

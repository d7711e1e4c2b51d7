//! End-to-end generation tests: request in, draft out, with mocked providers.

mod common;

use changelogy::changelog::write_changelog;
use changelogy::{
    ChangelogDraft, ChangelogGenerator, GenerateRequest, RequestError, generate_changelog,
};
use common::{anthropic_reply, generation_config, openai_error, openai_reply, request};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_openai(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_anthropic(server: &MockServer, template: ResponseTemplate, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(template)
        .expect(calls)
        .mount(server)
        .await;
}

fn build_generator(
    openai: Option<&MockServer>,
    anthropic: Option<&MockServer>,
) -> ChangelogGenerator {
    let openai = openai.map(|server| server.uri());
    let anthropic = anthropic.map(|server| server.uri());
    ChangelogGenerator::from_config(&generation_config(openai.as_deref(), anthropic.as_deref()))
        .unwrap()
}

async fn run(request: &GenerateRequest, generator: &ChangelogGenerator) -> ChangelogDraft {
    generate_changelog(request, generator, &CancellationToken::new())
        .await
        .unwrap()
}

fn quota_exhausted() -> ResponseTemplate {
    ResponseTemplate::new(429).set_body_json(openai_error(
        "You exceeded your current quota",
        "insufficient_quota",
    ))
}

#[tokio::test]
async fn test_openai_success() {
    let openai = MockServer::start().await;
    let anthropic = MockServer::start().await;
    mount_openai(
        &openai,
        ResponseTemplate::new(200).set_body_json(openai_reply("### Added\n\n* Export to CSV")),
    )
    .await;
    mount_anthropic(&anthropic, ResponseTemplate::new(500), 0).await;

    let generator = build_generator(Some(&openai), Some(&anthropic));
    let draft = run(&request(&["feat: export to CSV"]), &generator).await;

    assert!(draft.ai_used);
    assert_eq!(draft.fallback_reason, None);
    assert_eq!(draft.changelog, "### Added\n\n* Export to CSV");
}

#[tokio::test]
async fn test_ai_output_without_heading_gets_version_heading() {
    let openai = MockServer::start().await;
    mount_openai(
        &openai,
        ResponseTemplate::new(200).set_body_json(openai_reply("- Export to CSV")),
    )
    .await;

    let generator = build_generator(Some(&openai), None);
    let draft = run(&request(&["feat: export"]), &generator).await;

    assert_eq!(draft.changelog, "## 2.1.0\n\n- Export to CSV");
}

#[tokio::test]
async fn test_quota_moves_to_anthropic() {
    let openai = MockServer::start().await;
    let anthropic = MockServer::start().await;
    mount_openai(&openai, quota_exhausted()).await;
    mount_anthropic(
        &anthropic,
        ResponseTemplate::new(200)
            .set_body_json(anthropic_reply("## 2.1.0\n\n### Fixed\n\n- Crash on save")),
        1,
    )
    .await;

    let generator = build_generator(Some(&openai), Some(&anthropic));
    let draft = run(&request(&["fix: crash on save"]), &generator).await;

    assert!(draft.ai_used);
    assert_eq!(draft.changelog, "## 2.1.0\n\n### Fixed\n\n- Crash on save");
}

#[tokio::test]
async fn test_both_providers_fail() {
    let openai = MockServer::start().await;
    let anthropic = MockServer::start().await;
    mount_openai(&openai, quota_exhausted()).await;
    mount_anthropic(&anthropic, ResponseTemplate::new(500), 1).await;

    let generator = build_generator(Some(&openai), Some(&anthropic));
    let draft = run(&request(&["feat: add search", "fix: typo in docs"]), &generator).await;

    assert!(!draft.ai_used);
    assert_eq!(draft.fallback_reason.as_deref(), Some("Both providers failed"));
    assert_eq!(
        draft.changelog,
        "## 2.1.0\n\n### Added\n\n- feat: add search\n\n### Fixed\n\n- fix: typo in docs"
    );
}

#[tokio::test]
async fn test_non_quota_failure_skips_anthropic() {
    let openai = MockServer::start().await;
    let anthropic = MockServer::start().await;
    mount_openai(
        &openai,
        ResponseTemplate::new(401)
            .set_body_json(openai_error("Incorrect API key provided", "invalid_api_key")),
    )
    .await;
    mount_anthropic(&anthropic, ResponseTemplate::new(500), 0).await;

    let generator = build_generator(Some(&openai), Some(&anthropic));
    let draft = run(&request(&["docs: readme"]), &generator).await;

    assert!(!draft.ai_used);
    assert_eq!(
        draft.fallback_reason.as_deref(),
        Some("AI API key not configured or invalid")
    );
    assert_eq!(draft.changelog, "## 2.1.0\n\n### Other\n\n- docs: readme");
}

#[tokio::test]
async fn test_quota_without_secondary() {
    let openai = MockServer::start().await;
    mount_openai(&openai, quota_exhausted()).await;

    let generator = build_generator(Some(&openai), None);
    let draft = run(&request(&["feat: x"]), &generator).await;

    assert!(!draft.ai_used);
    assert_eq!(draft.fallback_reason.as_deref(), Some("AI API quota exceeded"));
}

#[tokio::test]
async fn test_anthropic_only() {
    let anthropic = MockServer::start().await;
    mount_anthropic(
        &anthropic,
        ResponseTemplate::new(200).set_body_json(anthropic_reply("## 2.1.0\n\n- Improved startup")),
        1,
    )
    .await;

    let generator = build_generator(None, Some(&anthropic));
    let draft = run(&request(&["perf: startup"]), &generator).await;

    assert!(draft.ai_used);
    assert_eq!(draft.changelog, "## 2.1.0\n\n- Improved startup");
}

#[tokio::test]
async fn test_cancelled_before_call_uses_rules() {
    let openai = MockServer::start().await;
    mount_openai(
        &openai,
        ResponseTemplate::new(200).set_body_json(openai_reply("never used")),
    )
    .await;

    let generator = build_generator(Some(&openai), None);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let draft = generate_changelog(&request(&["feat: x"]), &generator, &cancel)
        .await
        .unwrap();

    assert!(!draft.ai_used);
    assert_eq!(draft.fallback_reason.as_deref(), Some("AI generation cancelled"));
}

#[tokio::test]
async fn test_invalid_request_makes_no_calls() {
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_reply("never used")))
        .expect(0)
        .mount(&openai)
        .await;

    let generator = build_generator(Some(&openai), None);
    let mut req = request(&["feat: x"]);
    req.project_name = String::new();

    let result = generate_changelog(&req, &generator, &CancellationToken::new()).await;
    assert_eq!(result, Err(RequestError::MissingProjectOrVersion));
}

#[tokio::test]
async fn test_draft_prepends_to_changelog_file() {
    let dir = common::temp_test_dir();
    let path = dir.path().join("CHANGELOG.md");
    std::fs::write(&path, "# Changelog\n\n## 2.0.0\n\n- Older entry\n").unwrap();

    let draft = run(&request(&["feat: add export"]), &ChangelogGenerator::default()).await;
    write_changelog(&path, &draft.changelog).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let new_pos = content.find("## 2.1.0").unwrap();
    let old_pos = content.find("## 2.0.0").unwrap();
    assert!(content.starts_with("# Changelog\n\n"));
    assert!(new_pos < old_pos);
    assert!(content.contains("- feat: add export"));
}

//! Final normalization of generated Markdown.

use std::sync::LazyLock;

use regex_lite::Regex;

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank-run pattern is valid"));

static ODD_BULLETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*)[•·◦▪][ \t]+").expect("bullet pattern is valid")
});

/// Normalize a changelog document for display.
///
/// Trims the text, prepends `## <version_label>` when it does not open with
/// a heading, converts line endings to `\n`, collapses runs of blank lines
/// to one, and rewrites `•`/`·`-style bullets as `- `. Idempotent.
pub fn post_process(changelog: &str, version_label: &str) -> String {
    let trimmed = changelog.trim();
    let heading = format!("## {}", version_label.trim());
    let heading = heading.trim_end();

    let with_heading = if trimmed.starts_with('#') {
        trimmed.to_string()
    } else if trimmed.is_empty() {
        heading.to_string()
    } else {
        format!("{}\n\n{}", heading, trimmed)
    };

    let unix = with_heading.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = BLANK_RUNS.replace_all(&unix, "\n\n");

    ODD_BULLETS.replace_all(&collapsed, "${1}- ").into_owned()
}

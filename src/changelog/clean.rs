//! Display cleanup for user-edited changelog text.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Default length of listing-page summaries.
pub const DEFAULT_SUMMARY_LENGTH: usize = 180;

static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*•][ \t]+|\d+[.)][ \t]+)").expect("list marker pattern is valid")
});

/// Tidy free-form changelog text.
///
/// Lines are trimmed, blank runs collapse to a single blank line, any list
/// marker (`-`, `*`, `•`, `1.`, `1)`) becomes `- `, and every line starts
/// with an uppercase letter.
pub fn clean_changelog_text(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let normalized = normalized.trim();

    let mut cleaned: Vec<String> = Vec::new();
    let mut previous_blank = false;

    for line in normalized.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if !previous_blank && !cleaned.is_empty() {
                cleaned.push(String::new());
                previous_blank = true;
            }
            continue;
        }

        previous_blank = false;

        if LIST_MARKER.is_match(trimmed) {
            let text = LIST_MARKER.replace(trimmed, "");
            cleaned.push(format!("- {}", sentence_case(text.trim())));
        } else {
            cleaned.push(sentence_case(trimmed));
        }
    }

    cleaned.join("\n")
}

/// Short teaser built from the first three lines of a changelog.
pub fn build_summary(content: &str, max_length: usize) -> String {
    let condensed = content
        .lines()
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();

    if condensed.chars().count() <= max_length {
        return condensed;
    }

    let cut: String = condensed
        .chars()
        .take(max_length.saturating_sub(1))
        .collect();
    format!("{}…", cut.trim_end())
}

fn sentence_case(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

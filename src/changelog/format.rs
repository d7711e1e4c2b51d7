//! Rule-based categorization of commit subjects.

use serde::Serialize;

use crate::git::Commit;

/// Sections of a rule-based changelog, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChangelogCategory {
    Added,
    Changed,
    Fixed,
    Other,
}

impl ChangelogCategory {
    /// Rendering order of sections.
    pub const ALL: [ChangelogCategory; 4] = [Self::Added, Self::Changed, Self::Fixed, Self::Other];

    /// Get the display name for the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Fixed => "Fixed",
            Self::Other => "Other",
        }
    }
}

const ADDED_KEYWORDS: [&str; 4] = ["add", "new", "feature", "implement"];
const FIXED_KEYWORDS: [&str; 4] = ["fix", "bug", "error", "issue"];
const CHANGED_KEYWORDS: [&str; 5] = ["update", "change", "improve", "refactor", "enhance"];
const CHANGED_PREFIXES: [&str; 2] = ["chore:", "refactor:"];

/// Classify a commit subject line.
///
/// Precedence is Added, then Fixed, then Changed; so "fix: address typo"
/// lands in Added because it contains "add".
pub fn categorize(subject: &str) -> ChangelogCategory {
    let lower = subject.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if contains_any(&ADDED_KEYWORDS) || lower.starts_with("feat:") {
        ChangelogCategory::Added
    } else if contains_any(&FIXED_KEYWORDS) || lower.starts_with("fix:") {
        ChangelogCategory::Fixed
    } else if contains_any(&CHANGED_KEYWORDS)
        || CHANGED_PREFIXES.iter().any(|p| lower.starts_with(p))
    {
        ChangelogCategory::Changed
    } else {
        ChangelogCategory::Other
    }
}

/// Render a Markdown changelog without any external call.
///
/// Bullets carry the unmodified first line of each message; empty sections
/// are omitted.
pub fn generate_basic_changelog(commits: &[Commit], version_label: &str) -> String {
    if commits.is_empty() {
        return format!("## {}\n\nNo changes documented.", version_label);
    }

    let mut sections: [(ChangelogCategory, Vec<&str>); 4] =
        ChangelogCategory::ALL.map(|category| (category, Vec::new()));

    for commit in commits {
        let subject = commit.subject();
        let category = categorize(subject);
        if let Some((_, bucket)) = sections.iter_mut().find(|(c, _)| *c == category) {
            bucket.push(subject);
        }
    }

    let mut output = format!("## {}\n\n", version_label);

    for (category, subjects) in sections.iter().filter(|(_, s)| !s.is_empty()) {
        output.push_str(&format!("### {}\n\n", category.as_str()));
        for subject in subjects {
            output.push_str(&format!("- {}\n", subject));
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commits(messages: &[&str]) -> Vec<Commit> {
        messages
            .iter()
            .map(|m| Commit {
                message: m.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_categorize_precedence() {
        assert_eq!(categorize("feat: add export"), ChangelogCategory::Added);
        assert_eq!(categorize("Implement SSO"), ChangelogCategory::Added);
        assert_eq!(categorize("fix: crash on save"), ChangelogCategory::Fixed);
        assert_eq!(categorize("Resolve issue with login"), ChangelogCategory::Fixed);
        assert_eq!(categorize("chore: bump deps"), ChangelogCategory::Changed);
        assert_eq!(categorize("Improve caching"), ChangelogCategory::Changed);
        assert_eq!(categorize("docs: typo"), ChangelogCategory::Other);
        // "address" contains "add"
        assert_eq!(categorize("fix: address crash"), ChangelogCategory::Added);
    }

    #[test]
    fn test_categorize_is_case_insensitive() {
        assert_eq!(categorize("FEAT: Dark Mode"), ChangelogCategory::Added);
        assert_eq!(categorize("BUGFIX in parser"), ChangelogCategory::Fixed);
    }

    #[test]
    fn test_basic_changelog_sections_in_order() {
        let out = generate_basic_changelog(
            &commits(&["feat: add export", "fix: crash on save", "chore: bump deps"]),
            "1.0.0",
        );

        assert!(out.starts_with("## 1.0.0\n\n"));
        let added = out.find("### Added").unwrap();
        let changed = out.find("### Changed").unwrap();
        let fixed = out.find("### Fixed").unwrap();
        assert!(added < changed && changed < fixed);
        assert!(out.contains("### Added\n\n- feat: add export\n"));
        assert!(out.contains("### Fixed\n\n- fix: crash on save\n"));
        assert!(out.contains("### Changed\n\n- chore: bump deps\n"));
        assert!(!out.contains("### Other"));
    }

    #[test]
    fn test_basic_changelog_empty() {
        assert_eq!(
            generate_basic_changelog(&[], "2.0.0"),
            "## 2.0.0\n\nNo changes documented."
        );
    }

    #[test]
    fn test_basic_changelog_uses_first_line_only() {
        let out = generate_basic_changelog(&commits(&["Tweak layout\n\nLong body text"]), "v3");
        assert!(out.contains("### Other\n\n- Tweak layout\n"));
        assert!(!out.contains("Long body text"));
    }
}

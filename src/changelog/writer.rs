//! Write generated sections into a changelog file.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::ChangelogError;

/// Title line for new changelog files.
pub const CHANGELOG_HEADER: &str = "# Changelog\n\n";

/// Insert `section` at the top of the changelog at `path`.
///
/// - Creates the file with a `# Changelog` title if it doesn't exist
/// - Backs up an existing file to `<filename>.md.bak` (e.g., `CHANGELOG.md.bak`)
/// - Places the new section below the title and above older sections
/// - Replaces the file atomically
pub fn write_changelog(path: &Path, section: &str) -> Result<(), ChangelogError> {
    let section = section.trim();
    if section.is_empty() {
        return Err(ChangelogError::EmptyContent);
    }

    let existing = match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(ChangelogError::ReadFailed(e)),
    };

    let new_content = match existing {
        Some(existing) => {
            let backup_path = path.with_extension("md.bak");
            std::fs::copy(path, &backup_path).map_err(ChangelogError::BackupFailed)?;
            insert_section(&existing, section)
        }
        None => format!("{}{}\n", CHANGELOG_HEADER, section),
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(ChangelogError::WriteFailed)?;
    temp.write_all(new_content.as_bytes())
        .map_err(ChangelogError::WriteFailed)?;
    temp.persist(path)
        .map_err(|e| ChangelogError::WriteFailed(e.error))?;

    Ok(())
}

/// Place `section` after a leading `# ` title, or at the very top.
fn insert_section(existing: &str, section: &str) -> String {
    let insertion_point = find_insertion_point(existing);
    let (head, tail) = existing.split_at(insertion_point);

    let mut content = String::with_capacity(existing.len() + section.len() + 4);
    content.push_str(head);
    if !head.is_empty() && !head.ends_with("\n\n") {
        content.push_str(if head.ends_with('\n') { "\n" } else { "\n\n" });
    }
    content.push_str(section);
    content.push('\n');

    let tail = tail.trim_start_matches('\n');
    if !tail.is_empty() {
        content.push('\n');
        content.push_str(tail);
        if !content.ends_with('\n') {
            content.push('\n');
        }
    }
    content
}

/// Byte offset of the first line after the title block, or 0.
fn find_insertion_point(content: &str) -> usize {
    let mut offset = 0;
    let mut seen_title = false;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if !seen_title && trimmed.starts_with("# ") {
            seen_title = true;
        } else if trimmed.starts_with("## ") {
            return offset;
        } else if !seen_title && !trimmed.is_empty() {
            return 0;
        }
        offset += line.len();
    }

    if seen_title { content.len() } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_below_title_above_older_sections() {
        let existing = "# Changelog\n\nIntro text.\n\n## 1.0.0\n\n- Old\n";
        let updated = insert_section(existing, "## 1.1.0\n\n- New");
        assert_eq!(
            updated,
            "# Changelog\n\nIntro text.\n\n## 1.1.0\n\n- New\n\n## 1.0.0\n\n- Old\n"
        );
    }

    #[test]
    fn test_insert_without_title() {
        let updated = insert_section("## 1.0.0\n- Old\n", "## 2.0.0\n- New");
        assert_eq!(updated, "## 2.0.0\n- New\n\n## 1.0.0\n- Old\n");
    }

    #[test]
    fn test_insert_into_title_only_file() {
        let updated = insert_section("# Changelog\n", "## 0.1.0\n- First");
        assert_eq!(updated, "# Changelog\n\n## 0.1.0\n- First\n");
    }

    #[test]
    fn test_write_creates_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");

        write_changelog(&path, "## 1.0.0\n\n- First").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# Changelog\n\n## 1.0.0\n\n- First\n");
        assert!(!dir.path().join("CHANGELOG.md.bak").exists());
    }

    #[test]
    fn test_write_backs_up_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        std::fs::write(&path, "# Changelog\n\n## 1.0.0\n\n- Old\n").unwrap();

        write_changelog(&path, "## 1.1.0\n\n- New").unwrap();

        let backup = std::fs::read_to_string(dir.path().join("CHANGELOG.md.bak")).unwrap();
        assert_eq!(backup, "# Changelog\n\n## 1.0.0\n\n- Old\n");
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.find("## 1.1.0").unwrap() < content.find("## 1.0.0").unwrap());
    }

    #[test]
    fn test_write_rejects_empty_section() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_changelog(&dir.path().join("CHANGELOG.md"), "  \n");
        assert!(matches!(result, Err(ChangelogError::EmptyContent)));
    }
}

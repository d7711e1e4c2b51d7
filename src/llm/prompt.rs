//! Prompt construction for changelog generation.

use crate::git::ProcessedCommit;

use super::provider::ChatPrompt;

/// Separator placed between rendered commit records.
pub const COMMIT_SEPARATOR: &str = "\n\n---\n\n";

/// Placeholder used when a commit has no body.
pub const EMPTY_DESCRIPTION: &str = "(No additional details provided)";

/// Fixed system instructions sent to every provider.
pub const SYSTEM_PROMPT: &str = r#"You are an expert technical writer specializing in creating professional, user-friendly changelogs from Git commit messages.

Your task is to transform raw commit messages into a well-structured, readable changelog entry.

READ EACH COMMIT CAREFULLY:
1. The TITLE (first line) is the main summary of the change
2. The DESCRIPTION (body) adds context and details about the change
3. The CONTEXT (author, date) places the change on the timeline
4. Consider all three parts together to understand each change

GUIDELINES:
1. Group related changes into categories: Added, Changed, Fixed, Removed, Security, Performance
2. Write in present tense and active voice
3. Focus on user impact: what changed and why it matters
4. Be concise but descriptive, in clear non-technical language
5. Use information from both title and description
6. Drop noise such as "fix typo" or "update readme"
7. Merge similar commits into a single bullet point
8. Prioritize user-facing changes over internal refactoring

FORMAT:
- Markdown with ## for the version heading and ### for sections
- Bullet points (-) for each change
- A brief summary only if helpful"#;

/// Render normalized commits as labeled records for the prompt.
pub fn format_commits_for_prompt(commits: &[ProcessedCommit]) -> String {
    commits
        .iter()
        .enumerate()
        .map(|(index, commit)| format_commit(index + 1, commit))
        .collect::<Vec<_>>()
        .join(COMMIT_SEPARATOR)
}

fn format_commit(number: usize, commit: &ProcessedCommit) -> String {
    let mut record = format!("[Commit {}]\nTitle: {}\n", number, commit.title);

    if commit.description.trim().is_empty() {
        record.push_str(&format!("Description: {}\n", EMPTY_DESCRIPTION));
    } else {
        record.push_str(&format!("Description:\n{}\n", commit.description));
    }

    if !commit.context.is_empty() {
        record.push_str(&format!("Context: {}\n", commit.context));
    }

    record
}

/// Build the user message: project, version, commit data, and formatting rules.
pub fn build_user_prompt(
    project_name: &str,
    version_label: &str,
    commit_count: usize,
    formatted_commits: &str,
) -> String {
    let plural = if commit_count == 1 { "" } else { "s" };

    format!(
        r###"Create a professional changelog for "{project_name}" version "{version_label}".

Here are {commit_count} commit{plural} with their titles, descriptions, and context:

{formatted_commits}

INSTRUCTIONS:
1. Combine information from title AND description into informative entries
2. Don't just copy the title; enhance it with details from the description
3. Group commits logically into sections (Added, Changed, Fixed, Removed, Security, Performance)
4. Rewrite in user-friendly language, removing jargon where possible
5. Focus on what users will notice and benefit from
6. Use the version label "{version_label}" in the heading
7. Make the changelog professional and ready to publish

Generate ONLY the markdown changelog content, starting with "## {version_label}"."###
    )
}

/// Assemble the full chat prompt for a generation request.
pub fn build_chat_prompt(
    project_name: &str,
    version_label: &str,
    commits: &[ProcessedCommit],
    max_tokens: u32,
    temperature: f32,
) -> ChatPrompt {
    let formatted = format_commits_for_prompt(commits);

    ChatPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user: build_user_prompt(project_name, version_label, commits.len(), &formatted),
        max_tokens,
        temperature,
    }
}

//! URL slugs for projects and versions.

use std::sync::LazyLock;

use regex_lite::Regex;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is valid"));

/// Lowercase `input` and join its alphanumeric runs with single hyphens.
///
/// Non-ASCII letters are treated as separators, so `"Café Déjà"` becomes
/// `"caf-d-j"`.
pub fn slugify(input: &str) -> String {
    let lower = input.trim().to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// First free slug among `base`, `base-2`, `base-3`, ...
///
/// `fallback` stands in for inputs that slugify to nothing. `is_taken`
/// answers whether a candidate is already used in the caller's scope.
pub fn unique_slug<F>(input: &str, fallback: &str, mut is_taken: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let base = match slugify(input) {
        s if s.is_empty() => fallback.to_string(),
        s => s,
    };

    if !is_taken(&base) {
        return base;
    }

    let mut counter = 2u64;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

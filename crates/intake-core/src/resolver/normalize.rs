//! Label normalization shared by every matcher.

/// Normalize a human-entered label for comparison.
///
/// Lowercases, expands `&amp;` / `&` to `and`, collapses every run of
/// non-alphanumeric characters into one space and trims the ends.
#[must_use]
pub fn normalize_label(raw: &str) -> String {
    let expanded = raw
        .to_lowercase()
        .replace("&amp;", " and ")
        .replace('&', " and ");

    let mut normalized = String::with_capacity(expanded.len());
    let mut pending_space = false;
    for ch in expanded.chars() {
        if ch.is_alphanumeric() {
            if pending_space && !normalized.is_empty() {
                normalized.push(' ');
            }
            pending_space = false;
            normalized.push(ch);
        } else {
            pending_space = true;
        }
    }
    normalized
}

/// Whitespace-separated tokens of an already normalized label.
pub(crate) fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split(' ').filter(|token| !token.is_empty()).collect()
}

/// Whether `phrase` occurs in `normalized` on token boundaries.
pub(crate) fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    format!(" {normalized} ").contains(&format!(" {phrase} "))
}

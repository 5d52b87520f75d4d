//! Input normalization for note payloads: markup stripping, whitespace
//! collapsing, and tag cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of tags kept per note
pub const MAX_TAGS: usize = 10;

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Replace markup tags with spaces and collapse whitespace runs.
pub fn strip_html(html: &str) -> String {
    let without_tags = MARKUP_TAG.replace_all(html, " ");
    WHITESPACE_RUN
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Resolve the note's plain text: the trimmed explicit text when present,
/// otherwise text derived from the rich-text markup. `None` when neither
/// yields anything.
pub fn resolve_note_text(note_text: Option<&str>, note_html: Option<&str>) -> Option<String> {
    let explicit = note_text.map(str::trim).unwrap_or("");
    if !explicit.is_empty() {
        return Some(explicit.to_string());
    }

    let derived = strip_html(note_html.unwrap_or(""));
    if derived.is_empty() {
        None
    } else {
        Some(derived)
    }
}

/// Drop empty entries, trim the rest, and keep at most [`MAX_TAGS`].
/// Duplicates survive; deduplication is the client's job.
pub fn clean_tags(tags: Option<Vec<String>>) -> Vec<String> {
    tags.unwrap_or_default()
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(|t| t.trim().to_string())
        .take(MAX_TAGS)
        .collect()
}

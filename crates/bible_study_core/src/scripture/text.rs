//! Verse text cleanup shared by provider clients.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>?").expect("valid markup tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Strips markup tags, collapses whitespace runs to one space and trims.
pub fn clean_verse_text(raw: &str) -> String {
    let without_tags = MARKUP_TAG_RE.replace_all(raw, "");
    WHITESPACE_RE
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

use lazy_static::lazy_static;
use regex::Regex;

use crate::shared::constants::FALLBACK_PHOTO_NAME;

lazy_static! {
    /// Characters allowed to survive in a stored filename
    /// - Kept: ASCII letters, digits, `_`, `.`, `-`
    /// - Removed: everything else (quotes, brackets, `%`, `;`, ...)
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.\-]").unwrap();

    /// Runs of whitespace, collapsed into a single underscore
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Reduce a client-supplied filename to a safe, flat name.
///
/// Path separators never survive, so the result cannot point outside the
/// upload directory. Returns [`FALLBACK_PHOTO_NAME`] if nothing usable remains.
pub fn sanitize_filename(original: &str) -> String {
    let ascii: String = original
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = WHITESPACE_RUN.replace_all(ascii.trim(), "_");
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        FALLBACK_PHOTO_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Trim a free-text form value; blank values count as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

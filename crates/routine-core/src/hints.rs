//! Extraction of `[ADD id=...]` hint markers from assistant replies.
//!
//! Assistant text is untrusted. The pattern is compiled by the `regex` crate,
//! which matches in linear time, so hostile input cannot trigger
//! catastrophic backtracking.

use std::sync::LazyLock;

use regex::Regex;

// The id runs up to the first `]` on the same line.
static ADD_HINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[ADD\s+id=([^\]\r\n\x{2028}\x{2029}]*)\]").expect("hint pattern is valid")
});

/// Return the ids of every hint marker in `text`, in order of appearance.
///
/// Duplicates are kept and ids are not checked against the catalog. Partial
/// or malformed markers are skipped.
pub fn extract(text: &str) -> Vec<String> {
    ADD_HINT_PATTERN
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

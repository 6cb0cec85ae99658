//! Text helpers for terminal output.
//!
//! Shortening of long values and removal of ANSI color sequences (needed to
//! measure the visible width of colored titles).

use regex::Regex;
use std::sync::LazyLock;

/// Helper function to compile a regex pattern, panicking with a detailed error message
/// if compilation fails. Used for static regex patterns that are compile-time constants.
pub(crate) fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

const ANSI_PATTERN: &str = r"[\x1B\x{9B}][\[\]()#;?]*(?:(?:(?:[a-zA-Z\d]*(?:;[a-zA-Z\d]*)*)?\x07)|(?:(?:\d{1,4}(?:;\d{0,4})*)?[\dA-PRZcf-ntqry=><~]))";

static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(ANSI_PATTERN, "ANSI_RE"));

/// Removes ANSI escape sequences from `text`.
pub fn strip_ansi(text: &str) -> String {
    ANSI_RE.replace_all(text, "").into_owned()
}

/// Number of visible characters of a possibly colored string.
pub fn visible_width(text: &str) -> usize {
    strip_ansi(text).chars().count()
}

/// Cuts `text` to `max` characters, ending in `...`, unless `full` is set.
///
/// Counts characters, not bytes, so multi-byte text is never split inside a
/// code point.
pub fn shorten(text: &str, max: usize, full: bool) -> String {
    if full || max < 4 || text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

// SPDX-License-Identifier: MIT
// Context Resolver — nearest enclosing root-level key, plus word-span scanning.

use once_cell::sync::Lazy;
use regex::Regex;

/// A root-level directive: word characters at column 0, immediately followed
/// by a colon.
static ROOT_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+):").unwrap());

/// Resolve the nearest root-level key at or above `cursor_line`.
///
/// Walks upward line by line; the first line matching `^(\w+):` wins, or
/// `None` when the top of the document is reached without a match.
///
/// Deliberately not indentation-aware: a key at any indentation level between
/// two root keys is attributed to the nearest root key above it, not to its
/// true structural parent.
pub fn resolve_context<S: AsRef<str>>(lines: &[S], cursor_line: usize) -> Option<String> {
    let last = cursor_line.min(lines.len().checked_sub(1)?);
    lines[..=last]
        .iter()
        .rev()
        .find_map(|line| ROOT_KEY.captures(line.as_ref()).map(|c| c[1].to_string()))
}

/// True for the YAML-aware word character class: alphanumerics, `_`, `:`, `/`.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ':' || c == '/'
}

/// The maximal run of word characters containing or immediately adjacent to
/// `cursor_ch` on `line`, as character offsets.  May be empty (cursor between
/// non-word characters).
pub fn word_span(line: &str, cursor_ch: usize) -> (usize, usize) {
    let chars: Vec<char> = line.chars().collect();
    let mut start = cursor_ch.min(chars.len());
    let mut end = start;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    (start, end)
}

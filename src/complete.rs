//! Word completion
//!
//! Candidates come from a static scan of the buffer (every identifier)
//! plus the Python keyword set. Nothing in the buffer is ever evaluated;
//! completion is pure text.

use std::collections::BTreeSet;

use regex::Regex;

use crate::buffer::Buffer;
use crate::highlight::KEYWORDS;

/// Identifier pattern shared by candidate collection and prefix extraction
const WORD_PATTERN: &str = r"[A-Za-z_]\w*";

/// Collect the sorted, deduplicated candidates extending `prefix`
///
/// The exact prefix itself is not a candidate. An empty prefix yields
/// nothing (completing from nothing would offer the whole buffer).
pub fn completions(buffer: &Buffer, prefix: &str) -> Vec<String> {
    if prefix.is_empty() {
        return Vec::new();
    }

    let word = match Regex::new(WORD_PATTERN) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let mut candidates = BTreeSet::new();
    for idx in 0..buffer.line_count() {
        if let Some(line) = buffer.line(idx) {
            for m in word.find_iter(line.text()) {
                candidates.insert(m.as_str().to_string());
            }
        }
    }
    for kw in KEYWORDS {
        candidates.insert(kw.to_string());
    }

    candidates
        .into_iter()
        .filter(|c| c.starts_with(prefix) && c != prefix)
        .collect()
}

/// The identifier fragment ending at `cursor_byte` in `text`, if any
///
/// This is the prefix the completion popup completes: the run of word
/// characters immediately before the cursor.
pub fn prefix_at(text: &str, cursor_byte: usize) -> Option<(usize, &str)> {
    let before = &text[..cursor_byte.min(text.len())];
    let start = before
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ch.is_alphanumeric() || *ch == '_')
        .last()
        .map(|(idx, _)| idx)?;

    // A fragment starting with a digit is a number, not an identifier
    let fragment = &before[start..];
    if fragment.chars().next()?.is_ascii_digit() {
        return None;
    }
    Some((start, fragment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(lines: &[&str]) -> Buffer {
        Buffer::from_text("test", &lines.join("\n"))
    }

    #[test]
    fn test_candidates_from_buffer() {
        let buffer = buffer_with(&["value = compute_total(values)", "velocity = 2"]);
        let found = completions(&buffer, "va");
        assert_eq!(found, vec!["value", "values"]);
    }

    #[test]
    fn test_keywords_are_candidates() {
        let buffer = buffer_with(&[""]);
        let found = completions(&buffer, "el");
        assert_eq!(found, vec!["elif", "else"]);
    }

    #[test]
    fn test_exact_prefix_excluded() {
        let buffer = buffer_with(&["total = total + 1"]);
        assert!(completions(&buffer, "total").is_empty());

        let buffer = buffer_with(&["total = totals[0]"]);
        assert_eq!(completions(&buffer, "total"), vec!["totals"]);
    }

    #[test]
    fn test_deduplicated_and_sorted() {
        let buffer = buffer_with(&["abc abd", "abd abc abe"]);
        assert_eq!(completions(&buffer, "ab"), vec!["abc", "abd", "abe"]);
    }

    #[test]
    fn test_empty_prefix_yields_nothing() {
        let buffer = buffer_with(&["anything"]);
        assert!(completions(&buffer, "").is_empty());
    }

    #[test]
    fn test_prefix_at() {
        assert_eq!(prefix_at("x = val", 7), Some((4, "val")));
        assert_eq!(prefix_at("x = val", 5), Some((4, "v")));
        assert_eq!(prefix_at("x = ", 4), None);
        assert_eq!(prefix_at("", 0), None);
        assert_eq!(prefix_at("self._name", 10), Some((5, "_name")));
    }

    #[test]
    fn test_prefix_at_rejects_numbers() {
        assert_eq!(prefix_at("x = 42", 6), None);
    }
}

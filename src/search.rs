//! Find and replace over a buffer
//!
//! Plain-text search with the options the find/replace prompt exposes:
//! case sensitivity, whole-word matching and direction. Queries are
//! escaped before compilation, so they are never interpreted as patterns.

use regex::Regex;

use crate::buffer::Buffer;

/// Search options
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Distinguish upper and lower case
    pub match_case: bool,
    /// Match whole words only
    pub whole_word: bool,
    /// Search toward the start of the buffer
    pub backward: bool,
}

/// Compile a query into a matcher, honoring the options
///
/// Returns None for an empty query or one that produces an invalid
/// pattern (does not happen with escaped input).
fn build_matcher(query: &str, opts: SearchOptions) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }

    let mut pattern = regex::escape(query);
    if opts.whole_word {
        pattern = format!(r"\b{}\b", pattern);
    }
    if !opts.match_case {
        pattern = format!("(?i){}", pattern);
    }

    Regex::new(&pattern).ok()
}

/// Find the next match after (or before, when backward) the given position
///
/// Wraps around the buffer; returns the match's (line, byte column), or
/// None when the buffer holds no match at all.
pub fn find_from(
    buffer: &Buffer,
    query: &str,
    opts: SearchOptions,
    line: usize,
    col: usize,
) -> Option<(usize, usize)> {
    let matcher = build_matcher(query, opts)?;
    let line_count = buffer.line_count();

    if opts.backward {
        // Current line before the cursor, then lines above, then wrap
        let order = (0..=line.min(line_count - 1))
            .rev()
            .chain((line.min(line_count - 1) + 1..line_count).rev());
        for line_idx in order {
            let text = buffer.line(line_idx)?.text();
            let limit = if line_idx == line { col } else { text.len() + 1 };
            if let Some(m) = matcher.find_iter(text).filter(|m| m.start() < limit).last() {
                return Some((line_idx, m.start()));
            }
        }
        // Wrapped all the way around: allow a match at or after the cursor
        if let Some(text) = buffer.line(line).map(|l| l.text()) {
            if let Some(m) = matcher.find_iter(text).last() {
                return Some((line, m.start()));
            }
        }
    } else {
        // Current line after the cursor, then lines below, then wrap
        let order = (line..line_count).chain(0..line.min(line_count));
        for (pass, line_idx) in order.enumerate() {
            let text = buffer.line(line_idx)?.text();
            let from = if pass == 0 { col + 1 } else { 0 };
            if let Some(m) = matcher.find_iter(text).find(|m| m.start() >= from) {
                return Some((line_idx, m.start()));
            }
        }
        // Wrapped all the way around: allow the match under the cursor
        if let Some(text) = buffer.line(line).map(|l| l.text()) {
            if let Some(m) = matcher.find_iter(text).next() {
                return Some((line, m.start()));
            }
        }
    }

    None
}

/// Count every match in the buffer
pub fn count_matches(buffer: &Buffer, query: &str, opts: SearchOptions) -> usize {
    let matcher = match build_matcher(query, opts) {
        Some(m) => m,
        None => return 0,
    };

    (0..buffer.line_count())
        .filter_map(|idx| buffer.line(idx))
        .map(|line| matcher.find_iter(line.text()).count())
        .sum()
}

/// Replace every match in the buffer, returning the replacement count
pub fn replace_all(
    buffer: &mut Buffer,
    query: &str,
    replacement: &str,
    opts: SearchOptions,
) -> usize {
    let matcher = match build_matcher(query, opts) {
        Some(m) => m,
        None => return 0,
    };

    let mut total = 0;
    for idx in 0..buffer.line_count() {
        let (count, replaced) = match buffer.line(idx) {
            Some(line) => {
                let count = matcher.find_iter(line.text()).count();
                if count == 0 {
                    continue;
                }
                // NoExpand keeps '$' in the replacement literal
                let replaced = matcher
                    .replace_all(line.text(), regex::NoExpand(replacement))
                    .into_owned();
                (count, replaced)
            }
            None => continue,
        };

        if let Some(line) = buffer.line_mut(idx) {
            let len = line.len();
            line.delete_range(0, len);
            line.insert_str(0, &replaced);
        }
        total += count;
    }

    if total > 0 {
        buffer.set_modified(true);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(lines: &[&str]) -> Buffer {
        Buffer::from_text("test", &lines.join("\n"))
    }

    #[test]
    fn test_find_forward() {
        let buffer = buffer_with(&["alpha", "beta alpha", "gamma"]);
        let opts = SearchOptions::default();

        assert_eq!(find_from(&buffer, "alpha", opts, 0, 0), Some((1, 5)));
        assert_eq!(find_from(&buffer, "gamma", opts, 0, 0), Some((2, 0)));
        assert_eq!(find_from(&buffer, "missing", opts, 0, 0), None);
    }

    #[test]
    fn test_find_wraps_around() {
        let buffer = buffer_with(&["alpha", "beta"]);
        let opts = SearchOptions::default();

        // Cursor past the only match: wrap back to it
        assert_eq!(find_from(&buffer, "alpha", opts, 1, 0), Some((0, 0)));
        assert_eq!(find_from(&buffer, "alpha", opts, 0, 0), Some((0, 0)));
    }

    #[test]
    fn test_find_backward() {
        let buffer = buffer_with(&["alpha", "beta alpha", "gamma"]);
        let opts = SearchOptions {
            backward: true,
            ..Default::default()
        };

        assert_eq!(find_from(&buffer, "alpha", opts, 2, 0), Some((1, 5)));
        assert_eq!(find_from(&buffer, "alpha", opts, 1, 5), Some((0, 0)));
        // Wrap from the top back to the bottom-most match
        assert_eq!(find_from(&buffer, "alpha", opts, 0, 0), Some((1, 5)));
    }

    #[test]
    fn test_find_backward_wraps_to_cursor_line() {
        let opts = SearchOptions {
            backward: true,
            ..Default::default()
        };

        // The only match sits after the cursor on the cursor line
        let buffer = buffer_with(&["x alpha"]);
        assert_eq!(find_from(&buffer, "alpha", opts, 0, 0), Some((0, 2)));

        // Several matches on the wrapped line: the last one wins
        let buffer = buffer_with(&["x a b a"]);
        assert_eq!(find_from(&buffer, "a", opts, 0, 0), Some((0, 6)));
    }

    #[test]
    fn test_case_folding() {
        let buffer = buffer_with(&["Alpha ALPHA alpha"]);

        let insensitive = SearchOptions::default();
        assert_eq!(count_matches(&buffer, "alpha", insensitive), 3);

        let sensitive = SearchOptions {
            match_case: true,
            ..Default::default()
        };
        assert_eq!(count_matches(&buffer, "alpha", sensitive), 1);
        assert_eq!(find_from(&buffer, "ALPHA", sensitive, 0, 0), Some((0, 6)));
    }

    #[test]
    fn test_whole_word() {
        let buffer = buffer_with(&["pass passive pass"]);

        let opts = SearchOptions {
            whole_word: true,
            match_case: true,
            ..Default::default()
        };
        assert_eq!(count_matches(&buffer, "pass", opts), 2);
        assert_eq!(find_from(&buffer, "pass", opts, 0, 0), Some((0, 13)));
    }

    #[test]
    fn test_query_is_literal() {
        let buffer = buffer_with(&["a.c abc"]);
        let opts = SearchOptions::default();

        // '.' must not act as a wildcard
        assert_eq!(count_matches(&buffer, "a.c", opts), 1);
        assert_eq!(find_from(&buffer, "a.c", opts, 0, 1), Some((0, 0)));
    }

    #[test]
    fn test_empty_query() {
        let buffer = buffer_with(&["anything"]);
        assert_eq!(find_from(&buffer, "", SearchOptions::default(), 0, 0), None);
        assert_eq!(count_matches(&buffer, "", SearchOptions::default()), 0);
    }

    #[test]
    fn test_replace_all() {
        let mut buffer = buffer_with(&["foo bar", "bar foo bar"]);
        let opts = SearchOptions {
            match_case: true,
            ..Default::default()
        };

        let count = replace_all(&mut buffer, "bar", "qux", opts);
        assert_eq!(count, 3);
        assert_eq!(buffer.line(0).unwrap().text(), "foo qux");
        assert_eq!(buffer.line(1).unwrap().text(), "qux foo qux");
        assert!(buffer.is_modified());
    }

    #[test]
    fn test_replace_all_literal_dollars() {
        let mut buffer = buffer_with(&["price"]);
        let count = replace_all(&mut buffer, "price", "$1", SearchOptions::default());
        assert_eq!(count, 1);
        assert_eq!(buffer.line(0).unwrap().text(), "$1");
    }

    #[test]
    fn test_replace_none_keeps_unmodified() {
        let mut buffer = buffer_with(&["foo"]);
        let count = replace_all(&mut buffer, "zzz", "x", SearchOptions::default());
        assert_eq!(count, 0);
        assert!(!buffer.is_modified());
    }
}

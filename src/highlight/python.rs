//! Python line scanner
//!
//! Layered regex passes over a single line, in a fixed order. Each pass
//! appends its spans independently of the others, so spans overlap freely;
//! painting them in order reproduces the intended last-pass-wins result.
//!
//! The pass order and the quirks that fall out of it are deliberate and
//! pinned by tests: a word that is both a keyword and a call gets tagged by
//! both passes (the function-name pass paints over the keyword), `==` is
//! additionally re-matched by the `=` pattern, and the comment pass re-tags
//! a `#` even when it sits inside an already-matched string. The string
//! patterns do not understand escaped or triple quotes.

use regex::Regex;

use super::category::Category;
use super::span::HighlightSpan;

/// The fixed keyword set
pub const KEYWORDS: [&str; 18] = [
    "def", "class", "import", "from", "return", "if", "else", "elif", "for", "while", "try",
    "except", "finally", "with", "as", "yield", "lambda", "pass",
];

/// Operator tokens, each matched independently
const OPERATORS: [&str; 20] = [
    "=", "==", r"\(", r"\)", r"\.", ":", "<", ">", "<=", ">=", r"\+", "-", r"\*", "/", "%", ",",
    r"\[", r"\]", r"\{", r"\}",
];

/// Per-line scanner for Python-like source
pub struct PythonHighlighter {
    /// One whole-word pattern per keyword
    keyword_patterns: Vec<Regex>,
    /// Identifier followed by `(`; the paren is matched but excluded
    /// from the span, since the regex crate has no lookahead
    function_pattern: Regex,
    /// `.` followed by an identifier
    method_pattern: Regex,
    /// One literal pattern per operator token
    operator_patterns: Vec<Regex>,
    /// Double- or single-quoted literal, optionally f-prefixed
    string_pattern: Regex,
    /// Brace-delimited region inside an f-string (no nesting)
    fstring_variable_pattern: Regex,
    /// `#` to end of line
    comment_pattern: Regex,
}

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern).ok()
}

impl PythonHighlighter {
    /// Compile all passes; None only if a pattern fails to compile
    pub fn new() -> Option<Self> {
        let keyword_patterns = KEYWORDS
            .iter()
            .filter_map(|kw| compile(&format!(r"\b{}\b", kw)))
            .collect::<Vec<_>>();
        if keyword_patterns.len() != KEYWORDS.len() {
            return None;
        }

        let operator_patterns = OPERATORS
            .iter()
            .filter_map(|op| compile(op))
            .collect::<Vec<_>>();
        if operator_patterns.len() != OPERATORS.len() {
            return None;
        }

        Some(Self {
            keyword_patterns,
            function_pattern: compile(r"\b\w+\(")?,
            method_pattern: compile(r"\.\w+")?,
            operator_patterns,
            string_pattern: compile(r#"f"[^"]*"|f'[^']*'|"[^"]*"|'[^']*'"#)?,
            fstring_variable_pattern: compile(r"\{[^{}]*\}")?,
            comment_pattern: compile(r"#.*")?,
        })
    }

    /// Scan one line of text into highlight spans
    ///
    /// Never fails; text that matches nothing yields no spans. The result
    /// depends only on `text`, so repeated calls are byte-identical.
    pub fn scan_line(&self, text: &str) -> Vec<HighlightSpan> {
        let mut spans = Vec::new();

        // Pass 1: keywords, whole-word occurrences
        for pattern in &self.keyword_patterns {
            for m in pattern.find_iter(text) {
                spans.push(HighlightSpan::new(m.start(), m.len(), Category::Keyword));
            }
        }

        // Pass 2: function names
        for m in self.function_pattern.find_iter(text) {
            spans.push(HighlightSpan::new(
                m.start(),
                m.len() - 1,
                Category::FunctionName,
            ));
        }

        // Pass 3: methods and attributes, the dot itself excluded
        for m in self.method_pattern.find_iter(text) {
            spans.push(HighlightSpan::new(
                m.start() + 1,
                m.len() - 1,
                Category::MethodOrAttribute,
            ));
        }

        // Pass 4: operators
        for pattern in &self.operator_patterns {
            for m in pattern.find_iter(text) {
                spans.push(HighlightSpan::new(m.start(), m.len(), Category::Operator));
            }
        }

        // Pass 5: strings, with f-string interiors positioned on the line
        for m in self.string_pattern.find_iter(text) {
            spans.push(HighlightSpan::new(m.start(), m.len(), Category::String));

            if m.as_str().starts_with('f') {
                for var in self.fstring_variable_pattern.find_iter(m.as_str()) {
                    // Braces are excluded; empty braces emit nothing
                    if var.len() > 2 {
                        spans.push(HighlightSpan::new(
                            m.start() + var.start() + 1,
                            var.len() - 2,
                            Category::FStringVariable,
                        ));
                    }
                }
            }
        }

        // Pass 6: comments, applied last. A '#' inside a string is still
        // re-tagged here; that overlap is part of the contract.
        if let Some(m) = self.comment_pattern.find(text) {
            spans.push(HighlightSpan::new(m.start(), m.len(), Category::Comment));
        }

        spans
    }
}

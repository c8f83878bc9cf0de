//! Lexical categories recognized by the highlighter
//!
//! A category is purely presentational metadata: the scanner tags spans
//! with it and the renderer resolves it to a style.

use super::style::{Color, Style};

/// Lexical category of a highlighted span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Language keywords (def, class, if, ...)
    Keyword,
    /// Identifier immediately followed by `(`
    FunctionName,
    /// Identifier immediately preceded by `.`
    MethodOrAttribute,
    /// Operator and punctuation tokens
    Operator,
    /// `#` to end of line
    Comment,
    /// Quoted literal, including the f-prefixed variant
    String,
    /// Brace-delimited expression inside an f-string
    FStringVariable,
}

impl Category {
    /// Get the default style for this category
    ///
    /// Blue keywords, purple function names, cyan attributes, yellow
    /// operators, dim gray comments, red strings, bright-yellow
    /// f-string variables. ANSI palette only, so it follows the
    /// terminal theme.
    pub fn default_style(&self) -> Style {
        match self {
            Category::Keyword => Style::fg(Color::Blue).with_bold(),
            Category::FunctionName => Style::fg(Color::Magenta).with_italic(),
            Category::MethodOrAttribute => Style::fg(Color::Cyan),
            Category::Operator => Style::fg(Color::Yellow),
            Category::Comment => Style::fg(Color::BrightBlack).with_dim(),
            Category::String => Style::fg(Color::Red),
            Category::FStringVariable => Style::fg(Color::BrightYellow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_styled() {
        let categories = [
            Category::Keyword,
            Category::FunctionName,
            Category::MethodOrAttribute,
            Category::Operator,
            Category::Comment,
            Category::String,
            Category::FStringVariable,
        ];
        for category in categories {
            assert!(!category.default_style().is_default(), "{:?}", category);
        }
    }
}

//! Indentation and edit-policy engine
//!
//! Given one of the four classified key actions, the current line text and
//! the cursor position, computes the resulting buffer mutation as a value.
//! No state persists across calls; the tab size is read fresh every time.

/// The four key classes the engine responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    /// Advance to the next tab stop
    Tab,
    /// Remove up to one indent level from the start of the line
    BackTab,
    /// Unconditionally prepend one indent level to the line
    CtrlTab,
    /// Split the line, carrying (and possibly deepening) the indent
    Enter,
}

/// Result of the Enter computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterIndent {
    /// Indent string reproduced on the new line
    pub indent: String,
    /// Cursor column after the insert (end of the indent)
    pub cursor: usize,
}

/// A buffer mutation computed by [`apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Insert text at the cursor position
    InsertText(String),
    /// Insert text at the very start of the line
    PrependText(String),
    /// Remove this many characters from the start of the line
    StripPrefix(usize),
    /// Split the line at the cursor and indent the new line
    NewlineIndent(EnterIndent),
}

/// Count of leading space characters
pub fn leading_spaces(text: &str) -> usize {
    text.chars().take_while(|c| *c == ' ').count()
}

/// The column of the tab stop strictly after `column`
pub fn next_tab_stop(column: usize, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    (column / tab_size + 1) * tab_size
}

/// Spaces to insert so the cursor lands on the next tab stop
///
/// Always between 1 and `tab_size` spaces: a cursor already on a stop gets
/// a full level, never zero.
pub fn tab_insertion(column: usize, tab_size: usize) -> String {
    " ".repeat(next_tab_stop(column, tab_size) - column)
}

/// Leading spaces to remove from the whole line, at most `tab_size`
pub fn backtab_removal(line_text: &str, tab_size: usize) -> usize {
    leading_spaces(line_text).min(tab_size.max(1))
}

/// One full indent level, prepended regardless of cursor or existing indent
pub fn ctrl_tab_insertion(tab_size: usize) -> String {
    " ".repeat(tab_size.max(1))
}

/// Indent for the line created by Enter
///
/// Reproduces the whitespace prefix of the text before the cursor (not the
/// whole line), plus one extra level when the trimmed pre-cursor text ends
/// with `:` or `{`.
pub fn enter_indent(pre_cursor_text: &str, tab_size: usize) -> EnterIndent {
    let mut indent = " ".repeat(leading_spaces(pre_cursor_text));

    let trimmed = pre_cursor_text.trim_end();
    if trimmed.ends_with(':') || trimmed.ends_with('{') {
        indent.push_str(&" ".repeat(tab_size.max(1)));
    }

    let cursor = indent.len();
    EnterIndent { indent, cursor }
}

/// Dispatch one key action into the mutation it produces
///
/// `cursor_byte` is the cursor's byte offset within `line_text` and
/// `column` its display column; callers clamp both before the call.
pub fn apply(
    key: EditKey,
    line_text: &str,
    cursor_byte: usize,
    column: usize,
    tab_size: usize,
) -> EditOp {
    match key {
        EditKey::Tab => EditOp::InsertText(tab_insertion(column, tab_size)),
        EditKey::BackTab => EditOp::StripPrefix(backtab_removal(line_text, tab_size)),
        EditKey::CtrlTab => EditOp::PrependText(ctrl_tab_insertion(tab_size)),
        EditKey::Enter => {
            let pre_cursor = &line_text[..cursor_byte.min(line_text.len())];
            EditOp::NewlineIndent(enter_indent(pre_cursor, tab_size))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_spaces() {
        assert_eq!(leading_spaces(""), 0);
        assert_eq!(leading_spaces("x"), 0);
        assert_eq!(leading_spaces("    x"), 4);
        assert_eq!(leading_spaces("  \tx"), 2);
    }

    #[test]
    fn test_tab_insertion_columns() {
        assert_eq!(tab_insertion(0, 4), "    ");
        assert_eq!(tab_insertion(2, 4), "  ");
        assert_eq!(tab_insertion(3, 4), " ");
        // On a stop: full level, never zero
        assert_eq!(tab_insertion(4, 4), "    ");
        assert_eq!(tab_insertion(8, 4), "    ");
    }

    #[test]
    fn test_tab_insertion_other_widths() {
        assert_eq!(tab_insertion(0, 2), "  ");
        assert_eq!(tab_insertion(5, 3), " ");
        assert_eq!(tab_insertion(7, 8), " ");
    }

    #[test]
    fn test_backtab_removal() {
        assert_eq!(backtab_removal("  x", 4), 2);
        assert_eq!(backtab_removal("      x", 4), 4);
        assert_eq!(backtab_removal("x", 4), 0);
        assert_eq!(backtab_removal("    ", 4), 4);
    }

    #[test]
    fn test_ctrl_tab_insertion() {
        assert_eq!(ctrl_tab_insertion(4), "    ");
        assert_eq!(ctrl_tab_insertion(2), "  ");
    }

    #[test]
    fn test_enter_keeps_indent() {
        let result = enter_indent("    x = 1", 4);
        assert_eq!(result.indent, "    ");
        assert_eq!(result.cursor, 4);
    }

    #[test]
    fn test_enter_deepens_after_colon() {
        let result = enter_indent("    if x:", 4);
        assert_eq!(result.indent, "        ");
        assert_eq!(result.cursor, 8);
    }

    #[test]
    fn test_enter_deepens_after_brace() {
        let result = enter_indent("d = {", 4);
        assert_eq!(result.indent, "    ");
    }

    #[test]
    fn test_enter_trailing_whitespace_before_colon() {
        // Trailing spaces after the ':' are trimmed before the check
        let result = enter_indent("  for i in r:  ", 4);
        assert_eq!(result.indent, "      ");
    }

    #[test]
    fn test_enter_uses_pre_cursor_text_only() {
        // The engine sees only the text before the cursor; a ':' after
        // the cursor must not deepen the indent
        let op = apply(EditKey::Enter, "    if x:", 6, 6, 4);
        assert_eq!(
            op,
            EditOp::NewlineIndent(EnterIndent {
                indent: "    ".to_string(),
                cursor: 4,
            })
        );
    }

    #[test]
    fn test_apply_dispatch() {
        assert_eq!(
            apply(EditKey::Tab, "abc", 2, 2, 4),
            EditOp::InsertText("  ".to_string())
        );
        assert_eq!(apply(EditKey::BackTab, "      x", 0, 0, 4), EditOp::StripPrefix(4));
        assert_eq!(
            apply(EditKey::CtrlTab, "  x", 3, 3, 4),
            EditOp::PrependText("    ".to_string())
        );
    }
}

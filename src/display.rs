//! Display rendering
//!
//! Draws the text area with syntax painting and the line-number gutter,
//! plus the mode line and the minibuffer (message/prompt) line. All
//! layout math lives here so the editor can stay byte-oriented.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::buffer::Buffer;
use crate::config::Config;
use crate::error::Result;
use crate::highlight::{paint, Category, PythonHighlighter};
use crate::terminal::Terminal;

/// Display state
pub struct Display {
    /// Whether a full redraw is needed
    needs_redraw: bool,
    /// Message to show in minibuffer (bottom line)
    message: Option<String>,
}

/// Everything the renderer needs for one frame
pub struct Frame<'a> {
    pub buffer: &'a Buffer,
    /// "current/total" tab label for the mode line
    pub tab_label: String,
    pub cursor_line: usize,
    pub cursor_col: usize,
    pub top_line: usize,
    pub config: &'a Config,
    pub highlighter: Option<&'a PythonHighlighter>,
    /// Active prompt text; when set the cursor parks in the minibuffer
    pub prompt: Option<&'a str>,
}

impl Display {
    pub fn new() -> Self {
        Self {
            needs_redraw: true,
            message: None,
        }
    }

    /// Mark that a full redraw is needed
    pub fn force_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Set a message to display
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Clear the message
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Scroll so the cursor line is inside the text area, counting the
    /// visual rows wrapped lines occupy
    pub fn scroll_to_cursor(
        &self,
        terminal: &Terminal,
        frame_top: usize,
        cursor_line: usize,
        buffer: &Buffer,
        config: &Config,
    ) -> usize {
        let text_rows = terminal.rows().saturating_sub(2) as usize;
        if text_rows == 0 {
            return cursor_line;
        }

        let text_cols = self.text_cols(terminal, buffer, config);
        let mut top = frame_top.min(cursor_line);

        // Push the top down until the cursor line's rows fit
        loop {
            let mut used = 0;
            let mut fits = false;
            for line_idx in top..=cursor_line {
                let width = buffer.line(line_idx).map(|l| l.text().width()).unwrap_or(0);
                used += visual_rows(width, text_cols, config.wrap_mode);
                if used > text_rows {
                    break;
                }
                if line_idx == cursor_line {
                    fits = true;
                }
            }
            if fits || top == cursor_line {
                return top;
            }
            top += 1;
        }
    }

    /// Render one frame
    pub fn render(&mut self, terminal: &mut Terminal, frame: &Frame) -> Result<()> {
        let cols = terminal.cols() as usize;
        let rows = terminal.rows();
        let text_rows = rows.saturating_sub(2) as usize;

        if self.needs_redraw {
            terminal.clear_screen()?;
        }

        let gutter = gutter_width(frame.config, frame.buffer.line_count());
        let text_cols = cols.saturating_sub(gutter).max(1);

        let mut row = 0;
        let mut line_idx = frame.top_line;
        while row < text_rows {
            terminal.move_cursor(row as u16, 0)?;

            match frame.buffer.line(line_idx) {
                Some(line) => {
                    self.render_buffer_line(
                        terminal,
                        line.text(),
                        line_idx,
                        frame,
                        gutter,
                        text_cols,
                        &mut row,
                        text_rows,
                    )?;
                }
                None => {
                    // Empty line indicator past end of buffer
                    if gutter > 0 {
                        terminal.write_str(&" ".repeat(gutter))?;
                    }
                    terminal.set_dim(true)?;
                    terminal.write_char('~')?;
                    terminal.set_dim(false)?;
                    terminal.clear_to_eol()?;
                    row += 1;
                }
            }
            line_idx += 1;
        }

        self.render_mode_line(terminal, frame, rows.saturating_sub(2), cols)?;
        self.render_minibuffer(terminal, frame, rows.saturating_sub(1), cols)?;
        self.position_cursor(terminal, frame, gutter, text_cols)?;

        terminal.set_cursor_visible(true)?;
        terminal.flush()?;

        self.needs_redraw = false;
        Ok(())
    }

    /// Render one buffer line, wrapping across rows when wrap mode is on
    #[allow(clippy::too_many_arguments)]
    fn render_buffer_line(
        &self,
        terminal: &mut Terminal,
        text: &str,
        line_idx: usize,
        frame: &Frame,
        gutter: usize,
        text_cols: usize,
        row: &mut usize,
        text_rows: usize,
    ) -> Result<()> {
        self.render_gutter(terminal, gutter, Some(line_idx + 1))?;

        let spans = frame
            .highlighter
            .map(|h| h.scan_line(text))
            .unwrap_or_default();
        let cells = paint(text.len(), &spans);

        let mut col = 0;
        let mut current: Option<Category> = None;

        for (byte_idx, ch) in text.char_indices() {
            let ch_width = ch.width().unwrap_or(1);

            if col + ch_width > text_cols {
                if !frame.config.wrap_mode {
                    break;
                }
                // Continue on the next row with a blank gutter
                terminal.reset_attributes()?;
                terminal.clear_to_eol()?;
                *row += 1;
                if *row >= text_rows {
                    return Ok(());
                }
                terminal.move_cursor(*row as u16, 0)?;
                self.render_gutter(terminal, gutter, None)?;
                current = None;
                col = 0;
            }

            let category = cells.get(byte_idx).copied().flatten();
            if category != current {
                terminal.reset_attributes()?;
                if let Some(cat) = category {
                    terminal.apply_style(&cat.default_style())?;
                }
                current = category;
            }

            terminal.write_char(ch)?;
            col += ch_width;
        }

        terminal.reset_attributes()?;
        terminal.clear_to_eol()?;
        *row += 1;
        Ok(())
    }

    /// Draw the line-number gutter cell for one row
    ///
    /// `number` is None on continuation rows of a wrapped line.
    fn render_gutter(
        &self,
        terminal: &mut Terminal,
        gutter: usize,
        number: Option<usize>,
    ) -> Result<()> {
        if gutter == 0 {
            return Ok(());
        }
        match number {
            Some(n) => {
                let text = format!("{:>width$} ", n, width = gutter - 1);
                terminal.set_dim(true)?;
                terminal.write_str(&text)?;
                terminal.set_dim(false)?;
            }
            None => {
                terminal.write_str(&" ".repeat(gutter))?;
            }
        }
        Ok(())
    }

    /// Render the mode line
    fn render_mode_line(
        &self,
        terminal: &mut Terminal,
        frame: &Frame,
        row: u16,
        cols: usize,
    ) -> Result<()> {
        terminal.move_cursor(row, 0)?;
        terminal.set_reverse(true)?;

        let modified = if frame.buffer.is_modified() { "**" } else { "--" };
        let filename = frame
            .buffer
            .filename()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "no file".to_string());
        let column = frame
            .buffer
            .line(frame.cursor_line)
            .map(|l| l.byte_to_col(frame.cursor_col))
            .unwrap_or(0);

        let mode_line = format!(
            "{} pynote: {} ({}) [{}] L{} C{} ",
            modified,
            frame.buffer.name(),
            filename,
            frame.tab_label,
            frame.cursor_line + 1,
            column + 1,
        );

        let padded = if mode_line.width() < cols {
            format!("{}{}", mode_line, "-".repeat(cols - mode_line.width()))
        } else {
            truncate_to_width(&mode_line, cols)
        };

        terminal.write_str(&padded)?;
        terminal.set_reverse(false)?;
        Ok(())
    }

    /// Render the minibuffer (message or prompt line)
    fn render_minibuffer(
        &self,
        terminal: &mut Terminal,
        frame: &Frame,
        row: u16,
        cols: usize,
    ) -> Result<()> {
        terminal.move_cursor(row, 0)?;

        let content = frame.prompt.or(self.message.as_deref());
        if let Some(text) = content {
            terminal.write_str(&truncate_to_width(text, cols))?;
        }

        terminal.clear_to_eol()?;
        Ok(())
    }

    /// Park the hardware cursor at the right cell
    fn position_cursor(
        &self,
        terminal: &mut Terminal,
        frame: &Frame,
        gutter: usize,
        text_cols: usize,
    ) -> Result<()> {
        if let Some(prompt) = frame.prompt {
            let col = clamp_cell(prompt.width(), terminal.cols());
            terminal.move_cursor(terminal.rows().saturating_sub(1), col)?;
            return Ok(());
        }

        // Count visual rows of the lines above the cursor
        let mut screen_row = 0;
        for line_idx in frame.top_line..frame.cursor_line {
            let width = frame
                .buffer
                .line(line_idx)
                .map(|l| l.text().width())
                .unwrap_or(0);
            screen_row += visual_rows(width, text_cols, frame.config.wrap_mode);
        }

        let display_col = frame
            .buffer
            .line(frame.cursor_line)
            .map(|l| l.byte_to_col(frame.cursor_col))
            .unwrap_or(0);

        let (row_offset, col_in_row) = if frame.config.wrap_mode && text_cols > 0 {
            (display_col / text_cols, display_col % text_cols)
        } else {
            (0, display_col)
        };

        let screen_row = clamp_cell(screen_row + row_offset, terminal.rows());
        let screen_col = clamp_cell(gutter + col_in_row, terminal.cols());
        terminal.move_cursor(screen_row, screen_col)?;
        Ok(())
    }

    fn text_cols(&self, terminal: &Terminal, buffer: &Buffer, config: &Config) -> usize {
        let gutter = gutter_width(config, buffer.line_count());
        (terminal.cols() as usize).saturating_sub(gutter).max(1)
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

/// Width of the line-number gutter: digit count of the largest line
/// number, plus one separator column
pub fn gutter_width(config: &Config, line_count: usize) -> usize {
    if !config.show_line_numbers {
        return 0;
    }
    let mut digits = 1;
    let mut n = line_count.max(1);
    while n >= 10 {
        digits += 1;
        n /= 10;
    }
    digits + 1
}

/// Clamp a cell index to the last row/column of a screen dimension
///
/// Safe on a zero-size terminal, where there is no valid cell at all.
fn clamp_cell(value: usize, size: u16) -> u16 {
    value.min((size as usize).saturating_sub(1)) as u16
}

/// Visual rows a line of the given display width occupies
fn visual_rows(width: usize, text_cols: usize, wrap: bool) -> usize {
    if !wrap || width <= text_cols || text_cols == 0 {
        1
    } else {
        width.div_ceil(text_cols)
    }
}

/// Truncate a string to fit within a display width
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gutter_width_tracks_digit_count() {
        let config = Config::default();
        assert_eq!(gutter_width(&config, 0), 2);
        assert_eq!(gutter_width(&config, 1), 2);
        assert_eq!(gutter_width(&config, 9), 2);
        assert_eq!(gutter_width(&config, 10), 3);
        assert_eq!(gutter_width(&config, 99), 3);
        assert_eq!(gutter_width(&config, 100), 4);
        assert_eq!(gutter_width(&config, 12345), 6);
    }

    #[test]
    fn test_gutter_hidden() {
        let config = Config {
            show_line_numbers: false,
            ..Default::default()
        };
        assert_eq!(gutter_width(&config, 1000), 0);
    }

    #[test]
    fn test_visual_rows() {
        assert_eq!(visual_rows(0, 80, true), 1);
        assert_eq!(visual_rows(80, 80, true), 1);
        assert_eq!(visual_rows(81, 80, true), 2);
        assert_eq!(visual_rows(161, 80, true), 3);
        // Wrap off: always one row, the renderer truncates
        assert_eq!(visual_rows(500, 80, false), 1);
    }

    #[test]
    fn test_clamp_cell() {
        assert_eq!(clamp_cell(5, 80), 5);
        assert_eq!(clamp_cell(100, 80), 79);
        // Zero-size terminal must not underflow
        assert_eq!(clamp_cell(5, 0), 0);
        assert_eq!(clamp_cell(0, 0), 0);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("hello", 10), "hello");
        // Wide characters are never split
        assert_eq!(truncate_to_width("a日b", 2), "a");
        assert_eq!(truncate_to_width("a日b", 3), "a日");
    }
}

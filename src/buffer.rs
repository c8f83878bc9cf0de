//! Buffer representation - a collection of lines with associated metadata

use std::path::{Path, PathBuf};

use crate::error::{EditorError, Result};
use crate::line::Line;

/// A buffer containing text and metadata for one open file ("tab")
#[derive(Debug)]
pub struct Buffer {
    /// Lines of text
    lines: Vec<Line>,
    /// Buffer name shown in the mode line
    name: String,
    /// Associated file path (None for unnamed buffers)
    filename: Option<PathBuf>,
    /// Whether buffer has unsaved changes
    modified: bool,
}

impl Buffer {
    /// Create a new empty buffer with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            lines: vec![Line::new()], // Always have at least one line
            name: name.into(),
            filename: None,
            modified: false,
        }
    }

    /// Create a buffer from loaded content
    pub fn from_text(name: impl Into<String>, content: &str) -> Self {
        let lines: Vec<Line> = if content.is_empty() {
            vec![Line::new()]
        } else {
            content.lines().map(Line::from).collect()
        };

        Self {
            lines,
            name: name.into(),
            filename: None,
            modified: false,
        }
    }

    /// Create a buffer from file contents
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());

        let mut buffer = Self::from_text(name, &content);
        buffer.filename = Some(path.to_path_buf());
        Ok(buffer)
    }

    /// Get buffer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get filename if set
    pub fn filename(&self) -> Option<&PathBuf> {
        self.filename.as_ref()
    }

    /// Set the filename and rename the buffer to match
    pub fn set_filename(&mut self, path: PathBuf) {
        if let Some(stem) = path.file_name() {
            self.name = stem.to_string_lossy().into_owned();
        }
        self.filename = Some(path);
    }

    /// Check if buffer is modified
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Mark buffer as modified
    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Get number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a line by index
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Get a mutable line by index
    pub fn line_mut(&mut self, idx: usize) -> Option<&mut Line> {
        self.lines.get_mut(idx)
    }

    /// Insert a character at position
    pub fn insert_char(&mut self, line_idx: usize, byte_pos: usize, ch: char) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            line.insert_char(byte_pos, ch);
            self.modified = true;
        }
    }

    /// Insert a string at position
    pub fn insert_str(&mut self, line_idx: usize, byte_pos: usize, s: &str) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            line.insert_str(byte_pos, s);
            self.modified = true;
        }
    }

    /// Insert a newline, splitting the current line
    pub fn insert_newline(&mut self, line_idx: usize, byte_pos: usize) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            let new_line = line.split_off(byte_pos);
            self.lines.insert(line_idx + 1, new_line);
            self.modified = true;
        }
    }

    /// Delete the character at position, returns the deleted char
    pub fn delete_char(&mut self, line_idx: usize, byte_pos: usize) -> Option<char> {
        if let Some(line) = self.lines.get_mut(line_idx) {
            if let Some(ch_len) = line.next_char_len(byte_pos) {
                let deleted = line.delete_range(byte_pos, byte_pos + ch_len);
                self.modified = true;
                return deleted.chars().next();
            }
        }
        None
    }

    /// Delete backward (backspace), returns the new cursor position
    pub fn delete_backward(&mut self, line_idx: usize, byte_pos: usize) -> Option<usize> {
        if let Some(line) = self.lines.get_mut(line_idx) {
            if let Some(ch_len) = line.prev_char_len(byte_pos) {
                let new_pos = byte_pos - ch_len;
                line.delete_range(new_pos, byte_pos);
                self.modified = true;
                return Some(new_pos);
            }
        }
        None
    }

    /// Remove `count` bytes from the start of a line (backtab)
    pub fn strip_prefix(&mut self, line_idx: usize, count: usize) {
        if count == 0 {
            return;
        }
        if let Some(line) = self.lines.get_mut(line_idx) {
            line.delete_range(0, count.min(line.len()));
            self.modified = true;
        }
    }

    /// Join with previous line (backspace at start of line); returns the join column
    pub fn join_with_previous(&mut self, line_idx: usize) -> Option<usize> {
        if line_idx > 0 && line_idx < self.lines.len() {
            let current_line = self.lines.remove(line_idx);
            if let Some(prev_line) = self.lines.get_mut(line_idx - 1) {
                let join_pos = prev_line.len();
                prev_line.append(current_line);
                self.modified = true;
                return Some(join_pos);
            }
        }
        None
    }

    /// Join line with the next line (delete at end of line)
    pub fn join_line(&mut self, line_idx: usize) -> bool {
        if line_idx + 1 < self.lines.len() {
            let next_line = self.lines.remove(line_idx + 1);
            if let Some(line) = self.lines.get_mut(line_idx) {
                line.append(next_line);
                self.modified = true;
                return true;
            }
        }
        false
    }

    /// Write buffer to its file
    pub fn save(&mut self) -> Result<()> {
        let path = self.filename.clone().ok_or(EditorError::NoFileName)?;
        self.write_to(&path)?;
        self.modified = false;
        Ok(())
    }

    /// Write buffer to a specific path
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;
        let mut file = std::fs::File::create(path)?;
        for (i, line) in self.lines.iter().enumerate() {
            write!(file, "{}", line.text())?;
            if i < self.lines.len() - 1 {
                writeln!(file)?;
            }
        }
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new("untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(lines: &[&str]) -> Buffer {
        Buffer::from_text("test", &lines.join("\n"))
    }

    #[test]
    fn test_new_buffer_has_one_line() {
        let buffer = Buffer::new("test");
        assert_eq!(buffer.line_count(), 1);
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_insert_and_split() {
        let mut buffer = buffer_with(&["def main():"]);
        buffer.insert_newline(0, 11);
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(0).unwrap().text(), "def main():");
        assert_eq!(buffer.line(1).unwrap().text(), "");
        assert!(buffer.is_modified());
    }

    #[test]
    fn test_delete_backward_joins() {
        let mut buffer = buffer_with(&["abc", "def"]);
        let join_pos = buffer.join_with_previous(1);
        assert_eq!(join_pos, Some(3));
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(0).unwrap().text(), "abcdef");
    }

    #[test]
    fn test_strip_prefix() {
        let mut buffer = buffer_with(&["      x = 1"]);
        buffer.strip_prefix(0, 4);
        assert_eq!(buffer.line(0).unwrap().text(), "  x = 1");

        // Stripping more than the line holds is clamped
        let mut short = buffer_with(&["ab"]);
        short.strip_prefix(0, 10);
        assert_eq!(short.line(0).unwrap().text(), "");
    }

    #[test]
    fn test_delete_char_multibyte() {
        let mut buffer = buffer_with(&["aé"]);
        assert_eq!(buffer.delete_char(0, 1), Some('é'));
        assert_eq!(buffer.line(0).unwrap().text(), "a");
    }
}

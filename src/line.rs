//! Line representation and text operations

use unicode_width::UnicodeWidthStr;

/// A single line of text in a buffer, stored without its trailing newline
#[derive(Debug, Clone, Default)]
pub struct Line {
    text: String,
}

impl Line {
    /// Create a new empty line
    pub fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Insert a character at byte position
    pub fn insert_char(&mut self, byte_pos: usize, ch: char) {
        self.text.insert(byte_pos, ch);
    }

    /// Insert a string at byte position
    pub fn insert_str(&mut self, byte_pos: usize, s: &str) {
        self.text.insert_str(byte_pos, s);
    }

    /// Delete a range of bytes and return the deleted text
    pub fn delete_range(&mut self, start: usize, end: usize) -> String {
        let deleted: String = self.text[start..end].to_string();
        self.text.replace_range(start..end, "");
        deleted
    }

    /// Split the line at byte position, returning the remainder
    pub fn split_off(&mut self, byte_pos: usize) -> Line {
        Line {
            text: self.text.split_off(byte_pos),
        }
    }

    /// Append another line's content to this line
    pub fn append(&mut self, other: Line) {
        self.text.push_str(&other.text);
    }

    /// Get the display column for a byte position
    pub fn byte_to_col(&self, byte_pos: usize) -> usize {
        self.text[..byte_pos.min(self.text.len())].width()
    }

    /// Byte length of the character ending at `byte_pos`, if any
    pub fn prev_char_len(&self, byte_pos: usize) -> Option<usize> {
        self.text[..byte_pos.min(self.text.len())]
            .chars()
            .last()
            .map(|ch| ch.len_utf8())
    }

    /// Byte length of the character starting at `byte_pos`, if any
    pub fn next_char_len(&self, byte_pos: usize) -> Option<usize> {
        self.text.get(byte_pos..).and_then(|rest| rest.chars().next()).map(|ch| ch.len_utf8())
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self {
            text: s.to_string(),
        }
    }
}

impl From<String> for Line {
    fn from(s: String) -> Self {
        Self { text: s }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_line_operations() {
        let mut line = Line::from("hello");
        assert_eq!(line.text(), "hello");
        assert_eq!(line.len(), 5);
        assert!(!line.is_empty());

        line.insert_char(5, '!');
        assert_eq!(line.text(), "hello!");

        line.insert_str(0, ">> ");
        assert_eq!(line.text(), ">> hello!");
    }

    #[test]
    fn test_delete_range() {
        let mut line = Line::from("hello world");
        let deleted = line.delete_range(0, 6);
        assert_eq!(deleted, "hello ");
        assert_eq!(line.text(), "world");
    }

    #[test]
    fn test_split_and_append() {
        let mut line = Line::from("hello world");
        let remainder = line.split_off(6);
        assert_eq!(line.text(), "hello ");
        assert_eq!(remainder.text(), "world");

        line.append(remainder);
        assert_eq!(line.text(), "hello world");
    }

    #[test]
    fn test_char_lengths() {
        let line = Line::from("aé日");
        assert_eq!(line.next_char_len(0), Some(1));
        assert_eq!(line.next_char_len(1), Some(2));
        assert_eq!(line.next_char_len(3), Some(3));
        assert_eq!(line.next_char_len(6), None);

        assert_eq!(line.prev_char_len(6), Some(3));
        assert_eq!(line.prev_char_len(3), Some(2));
        assert_eq!(line.prev_char_len(1), Some(1));
        assert_eq!(line.prev_char_len(0), None);
    }

    #[test]
    fn test_byte_to_col_wide_chars() {
        let line = Line::from("a日b");
        assert_eq!(line.byte_to_col(0), 0);
        assert_eq!(line.byte_to_col(1), 1);
        // CJK character occupies two display columns
        assert_eq!(line.byte_to_col(4), 3);
        assert_eq!(line.byte_to_col(5), 4);
    }
}

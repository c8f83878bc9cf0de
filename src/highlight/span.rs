//! Highlight spans and span painting

use super::category::Category;

/// A highlighted lexical region within one line
///
/// Offsets are byte positions into the scanned line; `start + len` never
/// exceeds the line length. Spans from different passes may overlap; the
/// pass order decides which category a character cell ends up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Byte offset where this span starts
    pub start: usize,
    /// Length in bytes (always positive)
    pub len: usize,
    /// Lexical category of the region
    pub category: Category,
}

impl HighlightSpan {
    /// Create a new span
    pub fn new(start: usize, len: usize, category: Category) -> Self {
        Self {
            start,
            len,
            category,
        }
    }

    /// Byte offset one past the end of the span
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Resolve an ordered span list into per-byte category cells
///
/// Applies the spans in sequence so a later span overwrites an earlier one
/// on the cells they share (last writer wins). Spans reaching past
/// `line_len` are clipped rather than rejected.
pub fn paint(line_len: usize, spans: &[HighlightSpan]) -> Vec<Option<Category>> {
    let mut cells = vec![None; line_len];
    for span in spans {
        for cell in cells.iter_mut().skip(span.start).take(span.len) {
            *cell = Some(span.category);
        }
    }
    cells
}

//! Syntax highlighting module
//!
//! Provides the per-line Python scanner, the span/category model, and the
//! style types the renderer resolves categories into.

mod category;
mod python;
mod span;
mod style;

pub use category::Category;
pub use python::{PythonHighlighter, KEYWORDS};
pub use span::{paint, HighlightSpan};
pub use style::{Color, Style};

//! Heading representation for tree-sitter parsed documents.
//!
//! A heading is the read-only input to the TOC builder: its level, its text content and
//! the coordinates needed to write an anchor id back into the source. Headings are flat
//! in the source; any hierarchy is inferred later from the sequence of levels.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A heading element found inside the content container.
pub struct Heading {
    /// Heading level, 1 through 6.
    pub level: u8,
    /// Text content with markup stripped and whitespace collapsed.
    pub text: String,
    /// Zero-based line of the heading in the source.
    pub line: usize,
    /// Byte offset where the heading element begins.
    pub byte_start: usize,
    /// Byte offset where the heading element ends.
    pub byte_end: usize,
    /// Byte range replaced when writing the anchor id (empty range means insertion).
    pub anchor_span: (usize, usize),
}

impl Heading {
    #[must_use]
    /// Builds a heading whose anchor is inserted at `byte_start`.
    pub fn new(level: u8, text: impl Into<String>, line: usize, byte_start: usize) -> Self {
        Self {
            level,
            text: text.into(),
            line,
            byte_start,
            byte_end: byte_start,
            anchor_span: (byte_start, byte_start),
        }
    }
}

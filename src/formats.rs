//! Format trait and implementations for different document types.
//!
//! This module defines the `Format` trait which abstracts over the document formats an
//! article can arrive in (HTML pages, markdown sources) by providing the tree-sitter
//! language, the heading query and the way an anchor id is written back for each.

pub mod html;
pub mod markdown;

use crate::heading::Heading;
use std::path::Path;
use tree_sitter::Node;

/// A document type the heading search understands.
pub trait Format {
    /// Tree-sitter grammar for the format.
    fn language(&self) -> tree_sitter::Language;

    /// Query whose `@heading` capture marks every heading element.
    fn heading_query(&self) -> &str;

    /// Reads level, text and anchor coordinates from a captured heading node.
    fn heading(&self, node: Node<'_>, source: &str) -> Option<Heading>;

    /// Elements that scope the heading search. Empty means the whole document.
    fn containers<'t>(&self, _root: Node<'t>, _source: &str, _tag: &str) -> Vec<Node<'t>> {
        Vec::new()
    }

    /// Markup written over `heading.anchor_span` so that `#id` resolves to the heading.
    fn anchor_markup(&self, heading: &Heading, id: &str) -> String;

    /// Readable text of a source fragment, one paragraph per line.
    fn plain_text(&self, fragment: &str) -> String {
        fragment.to_string()
    }
}

#[must_use]
/// Picks the format handling a file, by extension.
pub fn for_path(path: &Path) -> Option<Box<dyn Format>> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "html" | "htm" | "xhtml" => Some(Box::new(html::HtmlFormat)),
        "md" | "markdown" => Some(Box::new(markdown::MarkdownFormat)),
        _ => None,
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

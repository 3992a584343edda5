//! Markdown format implementation using tree-sitter-md.
//!
//! This module provides tree-sitter queries for parsing markdown documents and extracting
//! headings from both ATX-style (# syntax) and setext-style (underlined) headings.
//! Heading text is read through the inline grammar so that emphasis and code-span
//! delimiters, escapes and link destinations do not reach the TOC.

use crate::formats::{collapse_whitespace, Format};
use crate::heading::Heading;
use tree_sitter::{Node, Parser};

/// Tree-sitter queries for ATX and setext markdown headings.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn heading_query(&self) -> &'static str {
        "[(atx_heading) (setext_heading)] @heading"
    }

    fn heading(&self, node: Node<'_>, source: &str) -> Option<Heading> {
        let mut level = None;
        let mut text = String::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "atx_h1_marker" | "setext_h1_underline" => level = Some(1),
                "atx_h2_marker" | "setext_h2_underline" => level = Some(2),
                "atx_h3_marker" => level = Some(3),
                "atx_h4_marker" => level = Some(4),
                "atx_h5_marker" => level = Some(5),
                "atx_h6_marker" => level = Some(6),
                // ATX content is an inline node, setext content a paragraph wrapping one
                "inline" | "paragraph" => {
                    text = child.utf8_text(source.as_bytes()).ok()?.to_string();
                }
                _ => {}
            }
        }

        let start = node.start_byte();
        let mut heading = Heading::new(
            level?,
            collapse_whitespace(&inline_text(strip_closing_sequence(&text))),
            node.start_position().row,
            start,
        );
        heading.byte_end = node.end_byte();
        Some(heading)
    }

    fn anchor_markup(&self, _heading: &Heading, id: &str) -> String {
        // The blank line ends the HTML block so the heading still parses as a heading
        format!("<a id=\"{id}\"></a>\n\n")
    }
}

/// Drops an optional ATX closing sequence (`## Title ##`).
fn strip_closing_sequence(text: &str) -> &str {
    let trimmed = text.trim_end();
    let without_hashes = trimmed.trim_end_matches('#');
    if without_hashes.len() == trimmed.len() {
        return trimmed;
    }
    if without_hashes.is_empty() || without_hashes.ends_with(char::is_whitespace) {
        without_hashes.trim_end()
    } else {
        trimmed
    }
}

/// Rendered text of inline markdown: delimiters dropped, link text kept.
fn inline_text(source: &str) -> String {
    let mut parser = Parser::new();
    if parser
        .set_language(&tree_sitter_md::INLINE_LANGUAGE.into())
        .is_err()
    {
        return source.to_string();
    }
    let Some(tree) = parser.parse(source, None) else {
        return source.to_string();
    };

    let mut dropped = Vec::new();
    collect_markup(tree.root_node(), &mut dropped);
    dropped.sort_unstable();

    let mut out = String::with_capacity(source.len());
    let mut pos = 0;
    for (start, end) in dropped {
        if start > pos {
            out.push_str(&source[pos..start]);
        }
        pos = pos.max(end);
    }
    out.push_str(&source[pos.min(source.len())..]);
    out
}

/// Byte ranges of inline syntax that does not render as text.
fn collect_markup(node: Node<'_>, dropped: &mut Vec<(usize, usize)>) {
    match node.kind() {
        "emphasis_delimiter" | "code_span_delimiter" => {
            dropped.push((node.start_byte(), node.end_byte()));
            return;
        }
        "backslash_escape" => {
            dropped.push((node.start_byte(), node.start_byte() + 1));
            return;
        }
        "inline_link" | "full_reference_link" | "collapsed_reference_link" | "image" => {
            let mut cursor = node.walk();
            let label = node
                .children(&mut cursor)
                .find(|child| matches!(child.kind(), "link_text" | "image_description"));
            if let Some(label) = label {
                dropped.push((node.start_byte(), label.start_byte()));
                dropped.push((label.end_byte(), node.end_byte()));
                collect_markup(label, dropped);
            }
            return;
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_markup(child, dropped);
    }
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;

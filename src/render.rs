//! Output of a build: the sidebar fragment, a text outline, JSON, and the annotated
//! source with anchor ids written onto the headings.

use crate::error::Result;
use crate::formats::Format;
use crate::heading::Heading;
use crate::toc::{Anchor, TocList, TocTree};
use std::fmt::Write;

/// Markup inserted into the sidebar when the document has no headings.
pub const COLLAPSED_FRAGMENT: &str = "<ul class=\"nav sidenav collapsed\"></ul>";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How a table of contents is printed.
pub enum OutputFormat {
    /// Nested list markup for the sidebar.
    Html,
    /// Indented outline.
    Text,
    /// The tree serialized as JSON.
    Json,
}

/// Renders the tree in the requested format; `None` renders the collapsed form.
///
/// # Errors
///
/// Returns an error only if JSON serialisation fails.
pub fn render(toc: Option<&TocTree>, format: OutputFormat) -> Result<String> {
    Ok(match (format, toc) {
        (OutputFormat::Html, Some(tree)) => html_fragment(tree),
        (OutputFormat::Html, None) => COLLAPSED_FRAGMENT.to_string(),
        (OutputFormat::Text, Some(tree)) => text_outline(tree),
        (OutputFormat::Text, None) => String::new(),
        (OutputFormat::Json, toc) => serde_json::to_string_pretty(&toc)?,
    })
}

#[must_use]
/// Nested list of anchor links, ready to append to the sidebar.
pub fn html_fragment(tree: &TocTree) -> String {
    let mut out = String::new();
    write_list(&tree.root, &mut out);
    out
}

fn write_list(list: &TocList, out: &mut String) {
    if list.level == 0 {
        out.push_str("<ul class=\"nav sidenav level-0\">");
    } else {
        let _ = write!(out, "<ul class=\"nav level-{}\">", list.level);
    }
    for node in &list.nodes {
        out.push_str("<li><a href=\"#");
        escape_attribute(&node.id, out);
        out.push_str("\" class=\"animate\">");
        escape_text(&node.text, out);
        out.push_str("</a>");
        if let Some(children) = &node.children {
            write_list(children, out);
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

#[must_use]
/// Indented plain-text outline, one entry per line.
pub fn text_outline(tree: &TocTree) -> String {
    let mut out = String::new();
    for entry in tree.flatten() {
        let indent = "  ".repeat(entry.depth);
        let _ = writeln!(out, "{indent}{} [#{}]", entry.node.text, entry.node.id);
    }
    out
}

#[must_use]
/// Writes each assigned anchor id onto its heading in the source text.
///
/// Edits are applied back to front so earlier byte offsets stay valid.
pub fn annotate(source: &str, headings: &[Heading], anchors: &[Anchor], format: &dyn Format) -> String {
    let mut edits: Vec<(usize, usize, String)> = anchors
        .iter()
        .filter_map(|anchor| {
            let heading = headings.get(anchor.heading_index)?;
            let (start, end) = heading.anchor_span;
            Some((start, end, format.anchor_markup(heading, &anchor.id)))
        })
        .collect();
    edits.sort_by_key(|(start, _, _)| std::cmp::Reverse(*start));

    let mut out = source.to_string();
    for (start, end, markup) in edits {
        if end <= out.len() && start <= end {
            out.replace_range(start..end, &markup);
        }
    }
    out
}

fn escape_text(text: &str, out: &mut String) {
    html_escape::encode_text_to_string(text, out);
}

fn escape_attribute(text: &str, out: &mut String) {
    html_escape::encode_double_quoted_attribute_to_string(text, out);
}

#[cfg(test)]
#[path = "tests/render.rs"]
mod tests;

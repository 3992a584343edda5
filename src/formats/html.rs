//! HTML format implementation using tree-sitter-html.
//!
//! Headings are `<h1>`..`<h6>` elements anywhere below the content container. Their text
//! is the concatenated text of the element's descendants with entities decoded, and
//! their anchor is the `id` attribute of the start tag.

use crate::formats::{collapse_whitespace, Format};
use crate::heading::Heading;
use tree_sitter::Node;

/// Tree-sitter queries for HTML heading elements.
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_html::LANGUAGE.into()
    }

    fn heading_query(&self) -> &'static str {
        r#"((element (start_tag (tag_name) @tag)) @heading (#match? @tag "^[hH][1-6]$"))"#
    }

    fn heading(&self, node: Node<'_>, source: &str) -> Option<Heading> {
        let start_tag = child_of_kind(node, "start_tag")?;
        let tag_name = child_of_kind(start_tag, "tag_name")?;
        let level = heading_level(tag_name.utf8_text(source.as_bytes()).ok()?)?;

        let mut heading = Heading::new(
            level,
            text_content(node, source),
            node.start_position().row,
            node.start_byte(),
        );
        heading.byte_end = node.end_byte();
        heading.anchor_span = match id_attribute(start_tag, source) {
            Some(attr) => (attr.start_byte(), attr.end_byte()),
            None => (tag_name.end_byte(), tag_name.end_byte()),
        };
        Some(heading)
    }

    fn containers<'t>(&self, root: Node<'t>, source: &str, tag: &str) -> Vec<Node<'t>> {
        let mut found = Vec::new();
        collect_elements(root, source, tag, &mut found);
        found
    }

    fn plain_text(&self, fragment: &str) -> String {
        strip_markup(fragment)
    }

    fn anchor_markup(&self, heading: &Heading, id: &str) -> String {
        let (start, end) = heading.anchor_span;
        if start == end {
            format!(" id=\"{id}\"")
        } else {
            format!("id=\"{id}\"")
        }
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    let bytes = tag.as_bytes();
    match bytes {
        [b'h' | b'H', digit @ b'1'..=b'6'] => Some(digit - b'0'),
        _ => None,
    }
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

fn element_tag<'s>(element: Node<'_>, source: &'s str) -> Option<&'s str> {
    let start_tag = child_of_kind(element, "start_tag")
        .or_else(|| child_of_kind(element, "self_closing_tag"))?;
    let name = child_of_kind(start_tag, "tag_name")?;
    name.utf8_text(source.as_bytes()).ok()
}

fn collect_elements<'t>(node: Node<'t>, source: &str, tag: &str, found: &mut Vec<Node<'t>>) {
    if node.kind() == "element"
        && element_tag(node, source).is_some_and(|name| name.eq_ignore_ascii_case(tag))
    {
        // Nested containers are already covered by the outer one
        found.push(node);
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_elements(child, source, tag, found);
    }
}

fn id_attribute<'t>(start_tag: Node<'t>, source: &str) -> Option<Node<'t>> {
    let mut cursor = start_tag.walk();
    let found = start_tag.children(&mut cursor).find(|attr| {
        attr.kind() == "attribute"
            && child_of_kind(*attr, "attribute_name")
                .and_then(|name| name.utf8_text(source.as_bytes()).ok())
                .is_some_and(|name| name.eq_ignore_ascii_case("id"))
    });
    found
}

/// Text of every descendant text node, the way a browser's `textContent` reads it.
fn text_content(element: Node<'_>, source: &str) -> String {
    let mut pieces: Vec<(usize, usize, String)> = Vec::new();
    collect_text(element, source, &mut pieces);

    let mut out = String::new();
    let mut prev_end = None;
    for (start, end, text) in pieces {
        if let Some(prev) = prev_end {
            if separated_by_whitespace(&source[prev..start]) {
                out.push(' ');
            }
        }
        out.push_str(&text);
        prev_end = Some(end);
    }
    collapse_whitespace(&out)
}

fn collect_text(node: Node<'_>, source: &str, pieces: &mut Vec<(usize, usize, String)>) {
    match node.kind() {
        "text" => {
            if let Ok(text) = node.utf8_text(source.as_bytes()) {
                pieces.push((node.start_byte(), node.end_byte(), decode_entities(text)));
            }
        }
        "entity" => {
            if let Ok(raw) = node.utf8_text(source.as_bytes()) {
                pieces.push((node.start_byte(), node.end_byte(), decode_entities(raw)));
            }
        }
        "start_tag" | "end_tag" | "script_element" | "style_element" | "comment" => {}
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_text(child, source, pieces);
            }
        }
    }
}

/// Whether the markup between two text runs renders as a space.
fn separated_by_whitespace(between: &str) -> bool {
    let mut in_tag = false;
    for c in between.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag && c.is_whitespace() => return true,
            _ => {}
        }
    }
    false
}

/// Decodes character references with the full HTML5 named-reference table.
fn decode_entities(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "pre", "blockquote", "section", "table", "tr", "hr",
    "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Drops tags and decodes entities, breaking lines at block-level elements.
///
/// A `<` that does not start a tag, comment or end tag is kept as text.
fn strip_markup(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut rest = fragment;
    let mut skip_until: Option<&str> = None;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' if opens_tag(&rest[1..]) => {
                let end = rest.find('>').map_or(rest.len(), |i| i + 1);
                let tag = rest[1..end].trim_end_matches('>');
                let name: String = tag
                    .trim_start_matches('/')
                    .chars()
                    .take_while(char::is_ascii_alphanumeric)
                    .collect::<String>()
                    .to_ascii_lowercase();
                let closing = tag.starts_with('/');
                match skip_until {
                    Some(raw) if closing && name == raw => skip_until = None,
                    Some(_) => {}
                    None if !closing && (name == "script" || name == "style") => {
                        skip_until = Some(if name == "script" { "script" } else { "style" });
                    }
                    None if BLOCK_TAGS.contains(&name.as_str()) => out.push('\n'),
                    None => {}
                }
                rest = &rest[end..];
            }
            _ => {
                if skip_until.is_none() {
                    out.push(c);
                }
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    decode_entities(&out)
        .lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn opens_tag(after: &str) -> bool {
    after
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!')
}

#[cfg(test)]
#[path = "../tests/html.rs"]
mod tests;

//! Locates documents on disk and extracts their headings with tree-sitter.
//!
//! Extraction is a pure function of the source text and a [`Format`]: the heading query
//! is run over the parse tree, matches outside the content container are discarded, and
//! the survivors are returned in document order.

use crate::error::{Result, SidenavError};
use crate::formats::{self, Format};
use crate::heading::Heading;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

/// A document read from disk together with the headings found in it.
pub struct Document {
    /// Location the document was read from.
    pub path: PathBuf,
    /// Full source text.
    pub source: String,
    /// Format chosen by extension.
    pub format: Box<dyn Format>,
    /// Headings inside the content container, in document order.
    pub headings: Vec<Heading>,
}

/// Expands the given paths into the documents to process.
///
/// Files named explicitly are kept when a format handles them; directories are walked
/// (respecting ignore files) and filtered by extension.
///
/// # Errors
///
/// Returns an error if a named path does not exist.
pub fn find_documents(paths: Vec<PathBuf>, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let paths = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };

    let mut documents = Vec::new();
    for path in paths {
        let meta = fs::metadata(&path).map_err(|e| SidenavError::io(&path, e))?;
        if meta.is_file() {
            if formats::for_path(&path).is_some() {
                documents.push(path);
            } else {
                log::warn!("skipping {}: no heading format for it", path.display());
            }
            continue;
        }

        for entry in WalkBuilder::new(&path).build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("walk error under {}: {e}", path.display());
                    continue;
                }
            };
            let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
            if is_file && has_extension(entry.path(), extensions) {
                documents.push(entry.into_path());
            }
        }
    }

    documents.sort();
    documents.dedup();
    Ok(documents)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// Reads a document and extracts its headings.
///
/// # Errors
///
/// Returns an error if the file cannot be read, no format handles it, or parsing fails.
pub fn load_document(path: &Path, container: &str) -> Result<Document> {
    let format = formats::for_path(path).ok_or_else(|| SidenavError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let source = fs::read_to_string(path).map_err(|e| SidenavError::io(path, e))?;
    let headings = extract_headings(&source, format.as_ref(), container)?;
    log::debug!("{}: {} headings", path.display(), headings.len());

    Ok(Document {
        path: path.to_path_buf(),
        source,
        format,
        headings,
    })
}

/// Runs the format's heading query and returns headings inside the container.
///
/// When the document has no element matching `container`, the whole document is the
/// content.
///
/// # Errors
///
/// Returns an error if the language or query is rejected, or no tree is produced.
pub fn extract_headings(source: &str, format: &dyn Format, container: &str) -> Result<Vec<Heading>> {
    let language = format.language();
    let mut parser = Parser::new();
    parser.set_language(&language)?;
    let tree = parser.parse(source, None).ok_or(SidenavError::Parse)?;
    let root = tree.root_node();

    let scopes: Vec<(usize, usize)> = format
        .containers(root, source, container)
        .iter()
        .map(|node| (node.start_byte(), node.end_byte()))
        .collect();
    if scopes.is_empty() {
        log::debug!("no <{container}> element, scanning the whole document");
    }

    let query = Query::new(&language, format.heading_query())?;
    let Some(heading_idx) = query.capture_index_for_name("heading") else {
        return Ok(Vec::new());
    };

    let mut headings = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, root, source.as_bytes());

    while let Some(m) = matches.next() {
        for capture in m.captures {
            if capture.index != heading_idx {
                continue;
            }
            let node = capture.node;
            let inside = scopes.is_empty()
                || scopes
                    .iter()
                    .any(|&(start, end)| node.start_byte() >= start && node.end_byte() <= end);
            if !inside {
                continue;
            }
            if let Some(heading) = format.heading(node, source) {
                headings.push(heading);
            }
        }
    }

    headings.sort_by_key(|h| h.byte_start);
    headings.dedup_by_key(|h| h.byte_start);
    Ok(headings)
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;

//! Errors raised by the document-handling shell.
//!
//! Building and synchronizing a TOC never fails: missing headings and missing geometry
//! are ordinary outcomes. Only reading files, choosing a parser and loading
//! configuration can go wrong, and those paths report through [`SidenavError`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while locating, reading or parsing a document.
#[derive(Error, Debug)]
pub enum SidenavError {
    /// Reading or writing a file failed.
    #[error("I/O failed on {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// No format handles the file's extension.
    #[error("no heading format handles {}", path.display())]
    UnsupportedFormat {
        /// File involved.
        path: PathBuf,
    },

    /// The grammar is incompatible with the linked tree-sitter.
    #[error("tree-sitter language rejected: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// A heading query does not compile.
    #[error("heading query is invalid: {0}")]
    Query(#[from] tree_sitter::QueryError),

    /// Parsing was cancelled before a tree was produced.
    #[error("tree-sitter produced no tree")]
    Parse,

    /// Serializing the tree failed.
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The config file is not valid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SidenavError {
    /// An IO failure on `path`.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result with [`SidenavError`].
pub type Result<T> = std::result::Result<T, SidenavError>;

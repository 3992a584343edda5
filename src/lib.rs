//! sidenav: a table of contents sidebar for articles, kept in step with the reader.
//!
//! The [`toc`] builder turns the headings of one document into a nested list, [`render`]
//! produces the sidebar markup and the anchored source, and [`sync`] coordinates the
//! [`affix`] and [`scrollspy`] behaviors against a [`geometry::Layout`].
#![allow(clippy::multiple_crate_versions)]

pub mod affix;
pub mod app_state;
pub mod config;
pub mod error;
pub mod formats;
pub mod geometry;
pub mod heading;
pub mod input;
pub mod render;
pub mod scrollspy;
pub mod sync;
pub mod throttle;
pub mod toc;
pub mod ui;

pub use error::{Result, SidenavError};
pub use toc::{build_toc, TocBuild, TocTree};

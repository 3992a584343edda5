//! Read-only view of page geometry consumed by the affix and scroll-spy behaviors.
//!
//! Every query may fail (a detached element has no offset); callers treat `None` as
//! "do nothing this time" rather than as an error.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// An element whose geometry can be measured.
pub enum Target<'a> {
    /// The sidebar that hosts the TOC.
    Sidebar,
    /// The main content container.
    Content,
    /// The heading an anchor id points at.
    Anchor(&'a str),
}

/// Layout measurements in document coordinates (y grows downwards from the page top).
pub trait Layout {
    /// Distance from the document top to the element top.
    fn offset_top(&self, target: Target<'_>) -> Option<f64>;
    /// Rendered height of the element.
    fn height(&self, target: Target<'_>) -> Option<f64>;
    /// Total scrollable height of the document.
    fn document_height(&self) -> Option<f64>;
    /// Height of the visible area.
    fn viewport_height(&self) -> Option<f64>;
    /// Current vertical scroll position.
    fn scroll_top(&self) -> f64;
}

#[derive(Clone, Debug, Default, PartialEq)]
/// A snapshot of page geometry.
pub struct PageGeometry {
    /// Vertical scroll position.
    pub scroll_top: f64,
    /// Visible height; zero or less means unknown.
    pub viewport_height: f64,
    /// Document height; zero or less means unknown.
    pub document_height: f64,
    /// Sidebar offset-top and height.
    pub sidebar: Option<(f64, f64)>,
    /// Content container offset-top and height.
    pub content: Option<(f64, f64)>,
    /// Offset-top of each anchored heading.
    pub anchors: HashMap<String, f64>,
}

impl PageGeometry {
    #[must_use]
    /// Adds the offset-top of the heading anchored at `id`.
    pub fn with_anchor(mut self, id: impl Into<String>, top: f64) -> Self {
        self.anchors.insert(id.into(), top);
        self
    }
}

impl Layout for PageGeometry {
    fn offset_top(&self, target: Target<'_>) -> Option<f64> {
        match target {
            Target::Sidebar => self.sidebar.map(|(top, _)| top),
            Target::Content => self.content.map(|(top, _)| top),
            Target::Anchor(id) => self.anchors.get(id).copied(),
        }
    }

    fn height(&self, target: Target<'_>) -> Option<f64> {
        match target {
            Target::Sidebar => self.sidebar.map(|(_, height)| height),
            Target::Content => self.content.map(|(_, height)| height),
            Target::Anchor(_) => None,
        }
    }

    fn document_height(&self) -> Option<f64> {
        (self.document_height > 0.0).then_some(self.document_height)
    }

    fn viewport_height(&self) -> Option<f64> {
        (self.viewport_height > 0.0).then_some(self.viewport_height)
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }
}

//! Affix: pins the sidebar while the reader is inside the content's scroll range.
//!
//! The range is given by two boundary callbacks that are re-run on every evaluation,
//! since document height changes as images and late content load.
//!
//! ```text
//! scroll <= top                      -> Top     (sidebar flows with the page)
//! pinned sidebar reaches the bottom  -> Bottom  (sidebar released above the footer)
//! otherwise                          -> Pinned  (sidebar fixed at `pinned_top`)
//! ```

use crate::geometry::{Layout, Target};

/// Computes one boundary from live geometry; `None` disables that boundary.
pub type Boundary = Box<dyn Fn(&dyn Layout) -> Option<f64>>;

/// The top and bottom boundaries of the pinning range.
pub struct AffixOffsets {
    /// Scroll position at or above which the element flows with the page.
    pub top: Boundary,
    /// Distance from the document bottom where pinning releases.
    pub bottom: Boundary,
}

impl AffixOffsets {
    #[must_use]
    /// Boundaries for a sidebar next to the content container.
    ///
    /// Pinning engages `lead_margin` before the sidebar reaches the viewport top and
    /// releases once the bottom of the content is reached.
    pub fn sidebar(lead_margin: f64) -> Self {
        Self {
            top: Box::new(move |layout| Some(layout.offset_top(Target::Sidebar)? - lead_margin)),
            bottom: Box::new(|layout| {
                let document = layout.document_height()?;
                let content_top = layout.offset_top(Target::Content)?;
                let content_height = layout.height(Target::Content)?;
                Some(document - content_top - content_height)
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where the element sits relative to its pinning range.
pub enum AffixState {
    /// Above the range: the element flows with the page.
    Top,
    /// Inside the range: the element is fixed in the viewport.
    Pinned,
    /// Past the range: the element is released above the bottom boundary.
    Bottom,
}

/// The pinning behavior for one element.
pub struct Affix {
    offsets: AffixOffsets,
    /// Viewport y at which the element sits while pinned.
    pinned_top: f64,
    state: Option<AffixState>,
    /// Boundaries measured by the latest evaluation.
    boundaries: (Option<f64>, Option<f64>),
}

impl Affix {
    #[must_use]
    /// Creates an unevaluated affix; it has no state until [`Affix::evaluate`] runs.
    pub fn new(offsets: AffixOffsets, pinned_top: f64) -> Self {
        Self {
            offsets,
            pinned_top,
            state: None,
            boundaries: (None, None),
        }
    }

    #[must_use]
    /// State from the latest evaluation.
    pub fn state(&self) -> Option<AffixState> {
        self.state
    }

    /// Re-measures both boundaries and updates the state from the scroll position.
    ///
    /// Without a measurable sidebar the previous state is kept.
    pub fn evaluate(&mut self, layout: &dyn Layout) -> Option<AffixState> {
        let top = (self.offsets.top)(layout);
        let bottom = (self.offsets.bottom)(layout);
        self.boundaries = (top, bottom);

        let Some(height) = layout.height(Target::Sidebar) else {
            return self.state;
        };
        let scroll = layout.scroll_top();

        let next = if top.is_some_and(|top| scroll <= top) {
            AffixState::Top
        } else if let (Some(bottom), Some(document)) = (bottom, layout.document_height()) {
            if scroll + self.pinned_top + height >= document - bottom {
                AffixState::Bottom
            } else {
                AffixState::Pinned
            }
        } else {
            AffixState::Pinned
        };

        if self.state != Some(next) {
            log::trace!("affix {:?} -> {next:?} at scroll {scroll}", self.state);
            self.state = Some(next);
        }
        self.state
    }

    #[must_use]
    /// Where the element's top sits in viewport coordinates for the current state.
    pub fn viewport_top(&self, layout: &dyn Layout) -> Option<f64> {
        let scroll = layout.scroll_top();
        match self.state? {
            AffixState::Top => Some(layout.offset_top(Target::Sidebar)? - scroll),
            AffixState::Pinned => Some(self.pinned_top),
            AffixState::Bottom => {
                let document = layout.document_height()?;
                let bottom = self.boundaries.1?;
                let height = layout.height(Target::Sidebar)?;
                Some(document - bottom - height - scroll)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/affix.rs"]
mod tests;

//! Scroll-spy: marks the TOC entry whose heading is currently in focus.
//!
//! Target offsets are measured on [`ScrollSpy::refresh`] and reused while scrolling; the
//! entry whose heading is the last one at or above `scroll + offset` is active. Scrolling
//! to the very end activates the last entry even when its heading never reaches the
//! threshold.

use crate::geometry::{Layout, Target};

/// Tracks which anchored heading the reader is at.
pub struct ScrollSpy {
    /// Added to the scroll position to account for fixed headers.
    offset: f64,
    /// Anchor ids in document order.
    targets: Vec<String>,
    /// Measured targets sorted by offset.
    measured: Vec<(f64, String)>,
    active: Option<String>,
    /// Document height seen by the latest measurement.
    scroll_height: Option<f64>,
    refreshes: usize,
}

impl ScrollSpy {
    #[must_use]
    /// Creates a spy over `targets`; nothing is measured until the first refresh.
    pub fn new(offset: f64, targets: Vec<String>) -> Self {
        Self {
            offset,
            targets,
            measured: Vec::new(),
            active: None,
            scroll_height: None,
            refreshes: 0,
        }
    }

    #[must_use]
    /// Anchor id of the active entry.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    #[must_use]
    /// How many times [`ScrollSpy::refresh`] has been invoked.
    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    /// Re-measures the offsets of every target.
    pub fn refresh(&mut self, layout: &dyn Layout) {
        self.refreshes += 1;
        self.measure(layout);
    }

    fn measure(&mut self, layout: &dyn Layout) {
        self.scroll_height = layout.document_height();
        self.measured = self
            .targets
            .iter()
            .filter_map(|id| Some((layout.offset_top(Target::Anchor(id))?, id.clone())))
            .collect();
        self.measured.sort_by(|a, b| a.0.total_cmp(&b.0));
        log::trace!(
            "scrollspy measured {}/{} targets",
            self.measured.len(),
            self.targets.len()
        );
    }

    /// Updates the active entry for the current scroll position and returns it.
    pub fn process(&mut self, layout: &dyn Layout) -> Option<&str> {
        // Late-loading content moves every heading
        if layout.document_height() != self.scroll_height {
            self.measure(layout);
        }
        if self.measured.is_empty() {
            self.clear();
            return None;
        }

        let scroll = layout.scroll_top() + self.offset;
        let last = self.measured.len() - 1;

        if let (Some(height), Some(viewport)) = (self.scroll_height, layout.viewport_height()) {
            let max_scroll = self.offset + height - viewport;
            if scroll >= max_scroll {
                self.activate(last);
                return self.active();
            }
        }

        if scroll < self.measured[0].0 {
            self.clear();
            return None;
        }

        for i in (0..=last).rev() {
            let reached = scroll >= self.measured[i].0;
            let before_next = i == last || scroll < self.measured[i + 1].0;
            if reached && before_next {
                self.activate(i);
                break;
            }
        }
        self.active()
    }

    fn activate(&mut self, index: usize) {
        let id = &self.measured[index].1;
        if self.active.as_deref() != Some(id.as_str()) {
            log::trace!("scrollspy active -> #{id}");
            self.active = Some(id.clone());
        }
    }

    fn clear(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
#[path = "tests/scrollspy.rs"]
mod tests;

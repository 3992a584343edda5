//! The preview state machine: a terminal "page" with the TOC sidebar kept in sync.
//!
//! The page is laid out in rows: a banner, the article (one row per heading followed by
//! its wrapped body text) and a footer. Row numbers are the document coordinates handed
//! to the [`Synchronizer`], so scrolling the page drives the same affix and scroll-spy
//! logic a browser host would, with one row standing in for the lead margin and the
//! spy offset.

use crate::config::Config;
use crate::geometry::PageGeometry;
use crate::input::Document;
use crate::sync::{HostState, Stabilization, SyncOptions, Synchronizer};
use crate::toc::{TocBuild, TocTree};
use std::collections::HashMap;
use std::time::Instant;

/// Rows above the article: title, underline, blank.
pub const HEADER_ROWS: usize = 3;
/// Rows below the article.
pub const FOOTER_ROWS: usize = 3;
/// Rows taken by the help bar under the page.
pub const HELP_ROWS: u16 = 3;
const SIDEBAR_MAX_WIDTH: u16 = 40;
const LEAD_ROWS: f64 = 1.0;
const SPY_ROWS: f64 = 1.0;

#[derive(Clone, Debug, PartialEq, Eq)]
/// What a page row shows.
pub enum RowKind {
    /// Document title block.
    Banner,
    /// A heading line.
    Heading {
        /// Anchor id of the heading.
        id: String,
        /// Heading level, 1 through 6.
        level: u8,
    },
    /// Wrapped body text or spacing.
    Body,
    /// Rows after the article.
    Footer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One terminal row of the page.
pub struct PageRow {
    /// Text drawn on the row.
    pub text: String,
    /// What the row shows.
    pub kind: RowKind,
}

/// A heading and the readable text that follows it.
struct Block {
    id: String,
    level: u8,
    title: String,
    body: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A sidebar line: depth below the root, text and anchor id.
pub struct SidebarEntry {
    /// Depth below the root list.
    pub depth: usize,
    /// Heading text.
    pub text: String,
    /// Anchor id the entry links to.
    pub id: String,
}

/// Everything the preview needs to draw a frame and react to input.
pub struct PreviewState {
    /// Document name shown in the banner.
    pub title: String,
    blocks: Vec<Block>,
    /// Built TOC, absent when the document has no headings.
    pub toc: Option<TocTree>,
    /// Laid out page rows for the current width.
    pub rows: Vec<PageRow>,
    /// Row of each anchored heading.
    anchor_rows: HashMap<String, usize>,
    /// First visible row.
    pub scroll: usize,
    /// Terminal size in cells.
    pub size: (u16, u16),
    /// Maximum line width for body text.
    pub wrap_width: usize,
    /// Affix and scroll-spy coordination.
    pub sync: Synchronizer,
    layout_signalled: bool,
    /// A scroll the throttle dropped, replayed on the next tick.
    pending_scroll: bool,
}

impl PreviewState {
    #[must_use]
    /// Lays out the document and attaches the synchronizer to the sidebar.
    pub fn new(
        doc: &Document,
        build: Option<TocBuild>,
        cfg: &Config,
        size: (u16, u16),
        now: Instant,
    ) -> Self {
        let ids: HashMap<usize, String> = build
            .iter()
            .flat_map(|b| &b.anchors)
            .map(|anchor| (anchor.heading_index, anchor.id.clone()))
            .collect();

        let blocks = doc
            .headings
            .iter()
            .enumerate()
            .map(|(i, heading)| {
                let body_end = doc
                    .headings
                    .get(i + 1)
                    .map_or(doc.source.len(), |next| next.byte_start);
                let body_start = heading.byte_end.min(body_end);
                Block {
                    id: ids.get(&i).cloned().unwrap_or_default(),
                    level: heading.level,
                    title: heading.text.clone(),
                    body: doc.format.plain_text(&doc.source[body_start..body_end]),
                }
            })
            .collect();

        let title = doc
            .path
            .file_name()
            .map_or_else(|| doc.path.display().to_string(), |n| n.to_string_lossy().to_string());

        let toc = build.map(|b| b.tree);
        let options = SyncOptions {
            lead_margin: LEAD_ROWS,
            spy_offset: SPY_ROWS,
            stabilization: Stabilization::LayoutReady,
            scroll_throttle: cfg.scroll_throttle(),
        };

        let mut state = Self {
            title,
            blocks,
            toc,
            rows: Vec::new(),
            anchor_rows: HashMap::new(),
            scroll: 0,
            size,
            wrap_width: cfg.wrap_width,
            sync: Synchronizer::attach(None, options, &PageGeometry::default(), now),
            layout_signalled: false,
            pending_scroll: false,
        };
        state.relayout();
        let geometry = state.geometry();
        state.sync = Synchronizer::attach(state.toc.as_ref(), options, &geometry, now);
        state
    }

    #[must_use]
    /// Whether the sidebar host is collapsed.
    pub fn is_collapsed(&self) -> bool {
        self.sync.host() == HostState::Collapsed
    }

    #[must_use]
    /// Sidebar lines in document order.
    pub fn sidebar_entries(&self) -> Vec<SidebarEntry> {
        self.toc.as_ref().map_or_else(Vec::new, |tree| {
            tree.flatten()
                .iter()
                .map(|entry| SidebarEntry {
                    depth: entry.depth,
                    text: entry.node.text.clone(),
                    id: entry.node.id.clone(),
                })
                .collect()
        })
    }

    #[must_use]
    /// Sidebar width in cells, zero when collapsed.
    pub fn sidebar_width(&self) -> u16 {
        if self.toc.is_none() {
            return 0;
        }
        let widest = self
            .sidebar_entries()
            .iter()
            .map(|e| e.depth * 2 + e.text.chars().count())
            .max()
            .unwrap_or(0);
        u16::try_from(widest + 4)
            .unwrap_or(SIDEBAR_MAX_WIDTH)
            .min(SIDEBAR_MAX_WIDTH)
            .min(self.size.0 / 2)
    }

    #[must_use]
    /// Sidebar height in rows including its border.
    pub fn sidebar_height(&self) -> usize {
        self.sidebar_entries().len() + 2
    }

    #[must_use]
    /// Visible page rows.
    pub fn viewport_height(&self) -> usize {
        usize::from(self.size.1.saturating_sub(HELP_ROWS))
    }

    #[must_use]
    /// Last valid first-visible row.
    pub fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(self.viewport_height())
    }

    #[must_use]
    /// Page geometry in rows for the current scroll position.
    pub fn geometry(&self) -> PageGeometry {
        let article_rows = self.rows.len().saturating_sub(HEADER_ROWS + FOOTER_ROWS);
        let mut geometry = PageGeometry {
            scroll_top: rows(self.scroll),
            viewport_height: rows(self.viewport_height()),
            document_height: rows(self.rows.len()),
            sidebar: None,
            content: Some((rows(HEADER_ROWS), rows(article_rows))),
            anchors: HashMap::new(),
        };
        if self.toc.is_some() {
            geometry.sidebar = Some((rows(HEADER_ROWS), rows(self.sidebar_height())));
        }
        for (id, row) in &self.anchor_rows {
            geometry.anchors.insert(id.clone(), rows(*row));
        }
        geometry
    }

    /// Rebuilds the page rows for the current terminal width.
    pub fn relayout(&mut self) {
        let content_width = usize::from(self.size.0.saturating_sub(self.sidebar_width()));
        let width = self.wrap_width.min(content_width.saturating_sub(2)).max(10);

        let mut rows = vec![
            PageRow {
                text: self.title.clone(),
                kind: RowKind::Banner,
            },
            PageRow {
                text: "=".repeat(self.title.chars().count()),
                kind: RowKind::Banner,
            },
            PageRow {
                text: String::new(),
                kind: RowKind::Banner,
            },
        ];
        let mut anchor_rows = HashMap::new();

        for block in &self.blocks {
            anchor_rows.insert(block.id.clone(), rows.len());
            rows.push(PageRow {
                text: format!("{} {}", "#".repeat(usize::from(block.level)), block.title),
                kind: RowKind::Heading {
                    id: block.id.clone(),
                    level: block.level,
                },
            });
            for line in block.body.lines() {
                for wrapped in wrap(line, width) {
                    rows.push(PageRow {
                        text: wrapped,
                        kind: RowKind::Body,
                    });
                }
            }
            rows.push(PageRow {
                text: String::new(),
                kind: RowKind::Body,
            });
        }

        for text in ["", "-- end of document --", ""] {
            rows.push(PageRow {
                text: text.to_string(),
                kind: RowKind::Footer,
            });
        }

        self.rows = rows;
        self.anchor_rows = anchor_rows;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Signals layout readiness after the first frame is on screen.
    pub fn frame_drawn(&mut self) {
        if !self.layout_signalled {
            self.layout_signalled = true;
            let geometry = self.geometry();
            self.sync.layout_ready(&geometry);
        }
    }

    /// Scrolls by `delta` rows and lets the synchronizer react.
    pub fn scroll_by(&mut self, delta: isize, now: Instant) {
        let target = self.scroll.saturating_add_signed(delta).min(self.max_scroll());
        self.scroll_to(target, now);
    }

    /// Scrolls so that `row` is the first visible row.
    pub fn scroll_to(&mut self, row: usize, now: Instant) {
        let row = row.min(self.max_scroll());
        if row == self.scroll {
            return;
        }
        self.scroll = row;
        let geometry = self.geometry();
        self.pending_scroll = self.sync.on_scroll(&geometry, now).is_none();
    }

    /// Replays a throttled scroll once the throttle allows it.
    pub fn tick(&mut self, now: Instant) {
        let geometry = self.geometry();
        self.sync.poll(now, &geometry);
        if self.pending_scroll {
            self.pending_scroll = self.sync.on_scroll(&geometry, now).is_none();
        }
    }

    /// Scrolls one page down.
    pub fn page_down(&mut self, now: Instant) {
        let page = isize::try_from(self.viewport_height().saturating_sub(1)).unwrap_or(1);
        self.scroll_by(page, now);
    }

    /// Scrolls one page up.
    pub fn page_up(&mut self, now: Instant) {
        let page = isize::try_from(self.viewport_height().saturating_sub(1)).unwrap_or(1);
        self.scroll_by(-page, now);
    }

    /// Terminal resized: re-wrap the page and have the scroll-spy re-measure.
    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.relayout();
        let geometry = self.geometry();
        self.sync.on_resize(&geometry);
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    /// Sidebar top in viewport rows; before the affix is armed it sits in the page flow.
    pub fn sidebar_top(&self) -> isize {
        let geometry = self.geometry();
        let top = self
            .sync
            .sidebar_top(&geometry)
            .unwrap_or(rows(HEADER_ROWS) - rows(self.scroll));
        top.round() as isize
    }
}

/// A row count in the geometry's units; terminal row counts are far below 2^52.
#[allow(clippy::cast_precision_loss)]
fn rows(count: usize) -> f64 {
    count as f64
}

/// Greedy word wrap; words longer than `width` get a row of their own.
fn wrap(line: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;

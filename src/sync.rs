//! The scroll synchronizer ties a rendered sidebar to the page.
//!
//! Attaching takes the builder's result. Without a tree the host is collapsed and only
//! resize handling remains. With a tree, the scroll-spy starts immediately and the
//! affix is armed once layout has settled, either on an explicit layout-ready signal
//! or after a fallback delay.

use crate::affix::{Affix, AffixOffsets, AffixState};
use crate::config::Config;
use crate::geometry::Layout;
use crate::scrollspy::ScrollSpy;
use crate::throttle::Throttle;
use crate::toc::TocTree;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Presentation state of the element hosting the sidebar.
pub enum HostState {
    /// A TOC is shown.
    Expanded,
    /// No TOC: the host is collapsed.
    Collapsed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// When affix boundaries may first be measured.
pub enum Stabilization {
    /// Wait for [`Synchronizer::layout_ready`].
    LayoutReady,
    /// Arm after this delay; checked by [`Synchronizer::poll`].
    Delay(Duration),
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Parameters of the synchronizer.
pub struct SyncOptions {
    /// Distance before the sidebar top at which pinning engages; also the pinned viewport y.
    pub lead_margin: f64,
    /// Offset added to the scroll position by the scroll-spy.
    pub spy_offset: f64,
    /// When the affix may first measure its boundaries.
    pub stabilization: Stabilization,
    /// Minimum interval between handled scroll events.
    pub scroll_throttle: Duration,
}

impl SyncOptions {
    #[must_use]
    /// Options from user configuration, arming the affix after the settle delay.
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            lead_margin: f64::from(cfg.lead_margin),
            spy_offset: f64::from(cfg.spy_offset),
            stabilization: Stabilization::Delay(cfg.settle_delay()),
            scroll_throttle: cfg.scroll_throttle(),
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Affix waiting for layout to settle.
struct PendingAffix {
    affix: Affix,
    deadline: Option<Instant>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// What a handled scroll event changed.
pub struct SyncUpdate {
    /// Affix state after the event, `None` while not armed.
    pub affix: Option<AffixState>,
    /// Active scroll-spy entry after the event.
    pub active: Option<String>,
}

/// Affix and scroll-spy attached to one sidebar.
pub struct Synchronizer {
    host: HostState,
    pending: Option<PendingAffix>,
    affix: Option<Affix>,
    spy: ScrollSpy,
    throttle: Throttle,
}

impl Synchronizer {
    /// Attaches to the sidebar given the builder's result.
    #[must_use]
    pub fn attach(
        toc: Option<&TocTree>,
        options: SyncOptions,
        layout: &dyn Layout,
        now: Instant,
    ) -> Self {
        let throttle = Throttle::new(options.scroll_throttle);

        let Some(tree) = toc else {
            log::debug!("no TOC, collapsing sidebar host");
            return Self {
                host: HostState::Collapsed,
                pending: None,
                affix: None,
                spy: ScrollSpy::new(options.spy_offset, Vec::new()),
                throttle,
            };
        };

        let targets = tree.anchor_ids().into_iter().map(String::from).collect();
        let mut spy = ScrollSpy::new(options.spy_offset, targets);
        spy.refresh(layout);
        spy.process(layout);

        let affix = Affix::new(AffixOffsets::sidebar(options.lead_margin), options.lead_margin);
        let deadline = match options.stabilization {
            Stabilization::LayoutReady => None,
            Stabilization::Delay(delay) => Some(now + delay),
        };

        Self {
            host: HostState::Expanded,
            pending: Some(PendingAffix { affix, deadline }),
            affix: None,
            spy,
            throttle,
        }
    }

    #[must_use]
    /// Presentation state of the host.
    pub fn host(&self) -> HostState {
        self.host
    }

    #[must_use]
    /// Active scroll-spy entry.
    pub fn active(&self) -> Option<&str> {
        self.spy.active()
    }

    #[must_use]
    /// Affix state, once armed and evaluated.
    pub fn affix_state(&self) -> Option<AffixState> {
        self.affix.as_ref().and_then(Affix::state)
    }

    #[must_use]
    /// Whether layout has settled and the affix is live.
    pub fn is_affix_armed(&self) -> bool {
        self.affix.is_some()
    }

    #[must_use]
    /// Viewport y of the sidebar top, once the affix is armed.
    pub fn sidebar_top(&self, layout: &dyn Layout) -> Option<f64> {
        self.affix.as_ref()?.viewport_top(layout)
    }

    #[must_use]
    /// Number of scroll-spy refreshes so far.
    pub fn refresh_count(&self) -> usize {
        self.spy.refresh_count()
    }

    /// Layout has settled: arm the affix now regardless of any pending delay.
    pub fn layout_ready(&mut self, layout: &dyn Layout) {
        if let Some(pending) = self.pending.take() {
            self.arm(pending.affix, layout);
        }
    }

    /// Arms a delayed affix once its deadline has passed.
    pub fn poll(&mut self, now: Instant, layout: &dyn Layout) {
        let due = self
            .pending
            .as_ref()
            .and_then(|pending| pending.deadline)
            .is_some_and(|deadline| now >= deadline);
        if due {
            self.layout_ready(layout);
        }
    }

    fn arm(&mut self, mut affix: Affix, layout: &dyn Layout) {
        affix.evaluate(layout);
        log::debug!("affix armed in state {:?}", affix.state());
        self.affix = Some(affix);
    }

    /// Handles a scroll event; throttled events return `None`.
    pub fn on_scroll(&mut self, layout: &dyn Layout, now: Instant) -> Option<SyncUpdate> {
        if self.host == HostState::Collapsed || !self.throttle.ready(now) {
            return None;
        }
        self.poll(now, layout);
        let affix = self.affix.as_mut().and_then(|affix| affix.evaluate(layout));
        let active = self.spy.process(layout).map(String::from);
        Some(SyncUpdate { affix, active })
    }

    /// Handles a viewport resize: geometry may have moved, so the spy re-measures.
    pub fn on_resize(&mut self, layout: &dyn Layout) {
        self.spy.refresh(layout);
        if self.host == HostState::Collapsed {
            return;
        }
        self.spy.process(layout);
        if let Some(affix) = self.affix.as_mut() {
            affix.evaluate(layout);
        }
    }
}

#[cfg(test)]
#[path = "tests/sync.rs"]
mod tests;

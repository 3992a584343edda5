use super::{HostState, Stabilization, SyncOptions, Synchronizer};
use crate::affix::AffixState;
use crate::geometry::PageGeometry;
use crate::heading::Heading;
use crate::throttle::Throttle;
use crate::toc::{build_toc, TocTree};
use std::time::{Duration, Instant};

const SETTLE: Duration = Duration::from_millis(100);
const THROTTLE: Duration = Duration::from_millis(16);

fn options(stabilization: Stabilization) -> SyncOptions {
    SyncOptions {
        lead_margin: 40.0,
        spy_offset: 10.0,
        stabilization,
        scroll_throttle: THROTTLE,
    }
}

fn tree() -> TocTree {
    let headings = vec![
        Heading::new(2, "A", 0, 0),
        Heading::new(3, "B", 1, 10),
        Heading::new(2, "C", 2, 20),
    ];
    build_toc(&headings, "").unwrap().tree
}

fn page(scroll_top: f64) -> PageGeometry {
    PageGeometry {
        scroll_top,
        viewport_height: 500.0,
        document_height: 2000.0,
        sidebar: Some((300.0, 200.0)),
        content: Some((300.0, 1500.0)),
        ..PageGeometry::default()
    }
    .with_anchor("0", 300.0)
    .with_anchor("1", 800.0)
    .with_anchor("2", 1400.0)
}

#[test]
fn test_absent_toc_collapses_host() {
    let t0 = Instant::now();
    let mut sync = Synchronizer::attach(None, options(Stabilization::Delay(SETTLE)), &page(0.0), t0);

    assert_eq!(sync.host(), HostState::Collapsed);
    assert_eq!(sync.active(), None);
    assert!(!sync.is_affix_armed());

    sync.poll(t0 + SETTLE, &page(0.0));
    assert!(!sync.is_affix_armed());
    assert_eq!(sync.on_scroll(&page(900.0), t0 + SETTLE), None);
}

#[test]
fn test_collapsed_host_still_refreshes_on_resize() {
    let mut sync = Synchronizer::attach(
        None,
        options(Stabilization::LayoutReady),
        &page(0.0),
        Instant::now(),
    );
    assert_eq!(sync.refresh_count(), 0);

    sync.on_resize(&page(0.0));
    assert_eq!(sync.refresh_count(), 1);
    assert_eq!(sync.host(), HostState::Collapsed);
}

#[test]
fn test_attach_starts_spy_immediately() {
    let toc = tree();
    let sync = Synchronizer::attach(
        Some(&toc),
        options(Stabilization::Delay(SETTLE)),
        &page(850.0),
        Instant::now(),
    );

    assert_eq!(sync.host(), HostState::Expanded);
    assert_eq!(sync.refresh_count(), 1);
    assert_eq!(sync.active(), Some("1"));
    assert!(!sync.is_affix_armed());
    assert_eq!(sync.sidebar_top(&page(850.0)), None);
}

#[test]
fn test_delay_arms_affix_after_deadline() {
    let toc = tree();
    let t0 = Instant::now();
    let mut sync =
        Synchronizer::attach(Some(&toc), options(Stabilization::Delay(SETTLE)), &page(0.0), t0);

    sync.poll(t0 + Duration::from_millis(99), &page(0.0));
    assert!(!sync.is_affix_armed());

    sync.poll(t0 + SETTLE, &page(0.0));
    assert!(sync.is_affix_armed());
    assert_eq!(sync.affix_state(), Some(AffixState::Top));
    assert_eq!(sync.sidebar_top(&page(0.0)), Some(300.0));
}

#[test]
fn test_layout_ready_arms_affix() {
    let toc = tree();
    let t0 = Instant::now();
    let mut sync =
        Synchronizer::attach(Some(&toc), options(Stabilization::LayoutReady), &page(0.0), t0);

    sync.poll(t0 + Duration::from_secs(60), &page(0.0));
    assert!(!sync.is_affix_armed(), "no delay was configured");

    sync.layout_ready(&page(1000.0));
    assert_eq!(sync.affix_state(), Some(AffixState::Pinned));

    // A second signal does not re-arm
    sync.layout_ready(&page(0.0));
    assert_eq!(sync.affix_state(), Some(AffixState::Pinned));
}

#[test]
fn test_scroll_updates_affix_and_spy() {
    let toc = tree();
    let t0 = Instant::now();
    let mut sync =
        Synchronizer::attach(Some(&toc), options(Stabilization::Delay(SETTLE)), &page(0.0), t0);

    // Before the deadline only the spy reacts
    let early = sync.on_scroll(&page(800.0), t0 + Duration::from_millis(50)).unwrap();
    assert_eq!(early.affix, None);
    assert_eq!(early.active.as_deref(), Some("1"));

    let update = sync.on_scroll(&page(1600.0), t0 + Duration::from_millis(200)).unwrap();
    assert_eq!(update.affix, Some(AffixState::Bottom));
    assert_eq!(update.active.as_deref(), Some("2"));

    let update = sync.on_scroll(&page(0.0), t0 + Duration::from_millis(300)).unwrap();
    assert_eq!(update.affix, Some(AffixState::Top));
    assert_eq!(update.active, None);
}

#[test]
fn test_scroll_events_are_throttled() {
    let toc = tree();
    let t0 = Instant::now();
    let mut sync =
        Synchronizer::attach(Some(&toc), options(Stabilization::LayoutReady), &page(0.0), t0);

    assert!(sync.on_scroll(&page(800.0), t0).is_some());
    assert!(sync.on_scroll(&page(1400.0), t0 + Duration::from_millis(5)).is_none());
    assert_eq!(sync.active(), Some("1"));

    let update = sync.on_scroll(&page(1400.0), t0 + THROTTLE).unwrap();
    assert_eq!(update.active.as_deref(), Some("2"));
}

#[test]
fn test_each_resize_refreshes_exactly_once() {
    let toc = tree();
    let mut sync = Synchronizer::attach(
        Some(&toc),
        options(Stabilization::LayoutReady),
        &page(0.0),
        Instant::now(),
    );
    assert_eq!(sync.refresh_count(), 1);

    sync.on_resize(&page(0.0));
    assert_eq!(sync.refresh_count(), 2);
    sync.on_resize(&page(0.0));
    sync.on_resize(&page(0.0));
    assert_eq!(sync.refresh_count(), 4);
}

#[test]
fn test_resize_remeasures_headings() {
    let toc = tree();
    let mut sync = Synchronizer::attach(
        Some(&toc),
        options(Stabilization::LayoutReady),
        &page(900.0),
        Instant::now(),
    );
    assert_eq!(sync.active(), Some("1"));

    // A narrower viewport pushes "1" below the fold without changing the page height
    let narrow = page(900.0).with_anchor("1", 1000.0);
    sync.on_resize(&narrow);
    assert_eq!(sync.active(), Some("0"));
}

#[test]
fn test_options_from_config() {
    let options = SyncOptions::default();
    assert_eq!(options.lead_margin, 40.0);
    assert_eq!(options.spy_offset, 10.0);
    assert_eq!(options.stabilization, Stabilization::Delay(SETTLE));
    assert_eq!(options.scroll_throttle, THROTTLE);
}

#[test]
fn test_throttle() {
    let t0 = Instant::now();
    let mut throttle = Throttle::new(THROTTLE);

    assert!(throttle.ready(t0));
    assert!(!throttle.ready(t0 + Duration::from_millis(15)));
    assert!(throttle.ready(t0 + THROTTLE));
    // Dropped events do not push the window forward
    assert!(!throttle.ready(t0 + Duration::from_millis(20)));
    assert!(throttle.ready(t0 + Duration::from_millis(32)));
}

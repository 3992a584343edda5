use super::{Affix, AffixOffsets, AffixState};
use crate::geometry::PageGeometry;

const LEAD: f64 = 40.0;

/// Sidebar at 300 (200 tall) beside content from 300 to 1800 on a 2000 page.
///
/// Top boundary: 300 - 40 = 260. Bottom boundary: 2000 - 300 - 1500 = 200.
fn page(scroll_top: f64) -> PageGeometry {
    PageGeometry {
        scroll_top,
        viewport_height: 500.0,
        document_height: 2000.0,
        sidebar: Some((300.0, 200.0)),
        content: Some((300.0, 1500.0)),
        ..PageGeometry::default()
    }
}

fn affix() -> Affix {
    Affix::new(AffixOffsets::sidebar(LEAD), LEAD)
}

#[test]
fn test_unevaluated_affix_has_no_state() {
    let affix = affix();
    assert_eq!(affix.state(), None);
    assert_eq!(affix.viewport_top(&page(0.0)), None);
}

#[test]
fn test_top_until_lead_margin() {
    let mut affix = affix();
    assert_eq!(affix.evaluate(&page(0.0)), Some(AffixState::Top));
    assert_eq!(affix.viewport_top(&page(0.0)), Some(300.0));

    assert_eq!(affix.evaluate(&page(260.0)), Some(AffixState::Top));
    assert_eq!(affix.viewport_top(&page(260.0)), Some(40.0));
}

#[test]
fn test_pinned_inside_content() {
    let mut affix = affix();
    assert_eq!(affix.evaluate(&page(261.0)), Some(AffixState::Pinned));
    assert_eq!(affix.viewport_top(&page(261.0)), Some(LEAD));

    assert_eq!(affix.evaluate(&page(1000.0)), Some(AffixState::Pinned));
    assert_eq!(affix.viewport_top(&page(1000.0)), Some(LEAD));
}

#[test]
fn test_bottom_when_sidebar_reaches_content_end() {
    let mut affix = affix();
    // 1560 + 40 + 200 = 1800 = 2000 - 200
    assert_eq!(affix.evaluate(&page(1559.0)), Some(AffixState::Pinned));
    assert_eq!(affix.evaluate(&page(1560.0)), Some(AffixState::Bottom));
    assert_eq!(affix.viewport_top(&page(1560.0)), Some(40.0));

    // Released: the sidebar scrolls away with the page
    assert_eq!(affix.evaluate(&page(1600.0)), Some(AffixState::Bottom));
    assert_eq!(affix.viewport_top(&page(1600.0)), Some(0.0));

    assert_eq!(affix.evaluate(&page(0.0)), Some(AffixState::Top));
}

#[test]
fn test_boundaries_follow_document_growth() {
    let mut affix = affix();
    assert_eq!(affix.evaluate(&page(1600.0)), Some(AffixState::Bottom));

    // Late content makes the article 1000 taller: the same position is pinned again
    let mut grown = page(1600.0);
    grown.document_height = 3000.0;
    grown.content = Some((300.0, 2500.0));
    assert_eq!(affix.evaluate(&grown), Some(AffixState::Pinned));
}

#[test]
fn test_missing_sidebar_keeps_previous_state() {
    let mut affix = affix();
    let mut detached = page(1000.0);
    detached.sidebar = None;
    assert_eq!(affix.evaluate(&detached), None);

    affix.evaluate(&page(1000.0));
    assert_eq!(affix.evaluate(&detached), Some(AffixState::Pinned));
}

#[test]
fn test_missing_content_disables_bottom_boundary() {
    let mut affix = affix();
    let mut geometry = page(1900.0);
    geometry.content = None;
    assert_eq!(affix.evaluate(&geometry), Some(AffixState::Pinned));
}

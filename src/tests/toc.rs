use super::{base_level, build_toc, TocList, TocNode};
use crate::heading::Heading;

fn headings(levels: &[u8]) -> Vec<Heading> {
    levels
        .iter()
        .enumerate()
        .map(|(i, &level)| Heading::new(level, format!("H{i}"), i, i * 10))
        .collect()
}

fn texts(list: &TocList) -> Vec<&str> {
    list.nodes.iter().map(|n| n.text.as_str()).collect()
}

fn children(node: &TocNode) -> &TocList {
    node.children.as_ref().expect("node should have children")
}

#[test]
fn test_no_headings_is_absent() {
    assert!(build_toc(&[], "").is_none());
    assert_eq!(base_level(&[]), None);
}

#[test]
fn test_base_level_is_minimum_level() {
    assert_eq!(base_level(&headings(&[3, 4, 2, 5])), Some(2));
    assert_eq!(base_level(&headings(&[6])), Some(6));
    assert_eq!(base_level(&headings(&[4, 1])), Some(1));
}

#[test]
fn test_scenario_h2_h3_h2() {
    let input = vec![
        Heading::new(2, "A", 0, 0),
        Heading::new(3, "B", 1, 10),
        Heading::new(2, "C", 2, 20),
    ];
    let build = build_toc(&input, "").unwrap();
    let root = &build.tree.root;

    assert_eq!(build.tree.base_level, 2);
    assert_eq!(root.level, 0);
    assert_eq!(texts(root), vec!["A", "C"]);

    let a = &root.nodes[0];
    assert_eq!(children(a).level, 1);
    assert_eq!(texts(children(a)), vec!["B"]);
    assert!(children(a).nodes[0].children.is_none());
    assert!(root.nodes[1].children.is_none(), "C has no children");
}

#[test]
fn test_ids_are_sequential_in_document_order() {
    let input = headings(&[1, 2, 3, 2, 1, 2, 3]);
    let build = build_toc(&input, "").unwrap();

    assert_eq!(build.anchors.len(), input.len());
    for (i, anchor) in build.anchors.iter().enumerate() {
        assert_eq!(anchor.heading_index, i);
        assert_eq!(anchor.id, i.to_string());
    }

    let ids = build.tree.anchor_ids();
    let expected: Vec<String> = (0..input.len()).map(|i| i.to_string()).collect();
    assert_eq!(ids, expected);
    assert_eq!(build.tree.len(), input.len());
}

#[test]
fn test_anchor_prefix() {
    let build = build_toc(&headings(&[2, 2]), "sec-").unwrap();
    assert_eq!(build.tree.anchor_ids(), vec!["sec-0", "sec-1"]);
    assert_eq!(build.anchors[1].id, "sec-1");
}

#[test]
fn test_deeper_heading_stays_under_first_subtree() {
    // [1, 2, 3, 2]: the h3 belongs to the first h2, not the second
    let build = build_toc(&headings(&[1, 2, 3, 2]), "").unwrap();
    let root = &build.tree.root;

    assert_eq!(texts(root), vec!["H0"]);
    let h1_children = children(&root.nodes[0]);
    assert_eq!(texts(h1_children), vec!["H1", "H3"]);
    assert_eq!(texts(children(&h1_children.nodes[0])), vec!["H2"]);
    assert!(h1_children.nodes[1].children.is_none());
}

#[test]
fn test_skip_level_attaches_to_nearest_shallower_container() {
    // [1, 3]: no level-2 container exists, so the h3 joins the h1's list
    let build = build_toc(&headings(&[1, 3]), "").unwrap();
    let root = &build.tree.root;

    assert_eq!(texts(root), vec!["H0"]);
    let nested = children(&root.nodes[0]);
    assert_eq!(nested.level, 1);
    assert_eq!(texts(nested), vec!["H1"]);
    assert_eq!(nested.nodes[0].offset, 2, "offset still follows the level");
    assert!(nested.nodes[0].children.is_none());
}

#[test]
fn test_skip_level_then_intermediate_level() {
    // h1, h4, h2, h3: the h2 becomes a sibling of the h4 and owns the h3
    let build = build_toc(&headings(&[1, 4, 2, 3]), "").unwrap();
    let nested = children(&build.tree.root.nodes[0]);

    assert_eq!(texts(nested), vec!["H1", "H2"]);
    assert_eq!(texts(children(&nested.nodes[1])), vec!["H3"]);
}

#[test]
fn test_deep_heading_after_new_section_uses_latest_container() {
    // The h3 goes to the most recently created level-2 container, under the first h1
    let build = build_toc(&headings(&[1, 2, 1, 3]), "").unwrap();
    let root = &build.tree.root;

    assert_eq!(texts(root), vec!["H0", "H2"]);
    let first = children(&root.nodes[0]);
    assert_eq!(texts(children(&first.nodes[0])), vec!["H3"]);
    assert!(root.nodes[1].children.is_none());
}

#[test]
fn test_first_heading_deeper_than_base() {
    // [3, 2]: the h3 has no container at offset 1 and lands at the root
    let build = build_toc(&headings(&[3, 2]), "").unwrap();
    assert_eq!(build.tree.base_level, 2);
    assert_eq!(texts(&build.tree.root), vec!["H0", "H1"]);
    assert_eq!(build.tree.root.nodes[0].offset, 1);
}

#[test]
fn test_pruning_is_idempotent() {
    let mut tree = build_toc(&headings(&[1, 2, 3, 2, 1, 2]), "").unwrap().tree;
    let before = tree.clone();

    assert_eq!(tree.root.prune(), 0);
    assert_eq!(tree, before);
}

#[test]
fn test_prune_removes_nested_empty_lists() {
    let mut list = TocList {
        level: 0,
        nodes: vec![TocNode {
            id: "0".to_string(),
            text: "A".to_string(),
            offset: 0,
            children: Some(TocList {
                level: 1,
                nodes: vec![TocNode {
                    id: "1".to_string(),
                    text: "B".to_string(),
                    offset: 1,
                    children: Some(TocList::new(2)),
                }],
            }),
        }],
    };

    assert_eq!(list.prune(), 1);
    let b = &list.nodes[0].children.as_ref().unwrap().nodes[0];
    assert!(b.children.is_none());
}

#[test]
fn test_flatten_depths() {
    let build = build_toc(&headings(&[2, 3, 4, 3, 2]), "").unwrap();
    let depths: Vec<usize> = build.tree.flatten().iter().map(|e| e.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 1, 0]);
}

//! The TOC builder: turns a flat run of headings into a nested list.
//!
//! Headings are siblings in the source, so hierarchy is inferred purely from the sequence
//! of levels. Each heading becomes a [`TocNode`] whose nesting offset is its level minus
//! the base level (the shallowest level present). Every node owns a child container one
//! level deeper; a new node is appended to the most recently created container whose
//! level equals its offset. Containers that end up empty are pruned.
//!
//! ```text
//! <h2>A</h2> <h3>B</h3> <h2>C</h2>      base level 2
//!
//! level-0: [ A, C ]
//!   A -> level-1: [ B ]
//!   B -> level-2: []   (pruned)
//!   C -> level-1: []   (pruned)
//! ```
//!
//! When no container exists at a node's offset (an `h1` directly followed by an `h3`),
//! the node joins the most recent container at the deepest shallower level instead. No
//! intermediate container is synthesized for it.

use crate::heading::Heading;
use serde::Serialize;

/// Deepest container level: an `h6` under an `h1` base owns a level-6 container.
const MAX_LEVEL: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One heading in the table of contents.
pub struct TocNode {
    /// Anchor id assigned to the heading; the entry links to `#id`.
    pub id: String,
    /// Display text.
    pub text: String,
    /// Heading level minus base level.
    pub offset: usize,
    /// Nested entries, `None` once pruned empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<TocList>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A nesting container and its entries, in document order.
pub struct TocList {
    /// Nesting level, 0 for the root list.
    pub level: usize,
    /// Entries in document order.
    pub nodes: Vec<TocNode>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// The built table of contents, rooted at a level-0 list.
pub struct TocTree {
    /// Shallowest heading level present.
    pub base_level: u8,
    /// The level-0 list.
    pub root: TocList,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Anchor id assigned to the heading at `heading_index` of the builder input.
pub struct Anchor {
    /// Index into the headings the tree was built from.
    pub heading_index: usize,
    /// Id written onto the heading.
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Result of a build: the tree plus the ids that must be written onto the headings.
pub struct TocBuild {
    /// The nested table of contents.
    pub tree: TocTree,
    /// One anchor per heading, in document order.
    pub anchors: Vec<Anchor>,
}

/// An entry of the tree in document order with its rendered depth.
#[derive(Clone, Copy, Debug)]
pub struct FlatEntry<'a> {
    /// Depth below the root list.
    pub depth: usize,
    /// The entry itself.
    pub node: &'a TocNode,
}

impl TocList {
    #[must_use]
    /// An empty list at `level`.
    pub fn new(level: usize) -> Self {
        Self {
            level,
            nodes: Vec::new(),
        }
    }

    /// Removes every nested container without entries, returning how many were removed.
    pub fn prune(&mut self) -> usize {
        let mut removed = 0;
        for node in &mut self.nodes {
            if let Some(children) = node.children.as_mut() {
                removed += children.prune();
                if children.nodes.is_empty() {
                    node.children = None;
                    removed += 1;
                }
            }
        }
        removed
    }

    fn flatten_into<'a>(&'a self, depth: usize, out: &mut Vec<FlatEntry<'a>>) {
        for node in &self.nodes {
            out.push(FlatEntry { depth, node });
            if let Some(children) = &node.children {
                children.flatten_into(depth + 1, out);
            }
        }
    }
}

impl TocTree {
    #[must_use]
    /// Entries in document order, each with its depth below the root.
    pub fn flatten(&self) -> Vec<FlatEntry<'_>> {
        let mut out = Vec::new();
        self.root.flatten_into(0, &mut out);
        out
    }

    #[must_use]
    /// Anchor ids in tree order.
    pub fn anchor_ids(&self) -> Vec<&str> {
        self.flatten().iter().map(|entry| entry.node.id.as_str()).collect()
    }

    #[must_use]
    /// Number of entries at every depth.
    pub fn len(&self) -> usize {
        self.flatten().len()
    }

    #[must_use]
    /// Whether the root list has no entries.
    pub fn is_empty(&self) -> bool {
        self.root.nodes.is_empty()
    }
}

#[must_use]
/// The shallowest heading level present, scanning levels 1 through 6.
pub fn base_level(headings: &[Heading]) -> Option<u8> {
    (1..=6u8).find(|level| headings.iter().any(|h| h.level == *level))
}

/// Where a container lives: the root list or the child list of an arena node.
#[derive(Clone, Copy, Debug)]
enum Owner {
    Root,
    Node(usize),
}

struct Slot {
    text: String,
    offset: usize,
    children: Vec<usize>,
}

#[must_use]
/// Builds the table of contents for the headings of one document.
///
/// Returns `None` when no heading of level 1–6 is present.
pub fn build_toc(headings: &[Heading], anchor_prefix: &str) -> Option<TocBuild> {
    let base = base_level(headings)?;
    log::debug!("base level h{base} over {} headings", headings.len());

    let mut slots: Vec<Slot> = Vec::with_capacity(headings.len());
    let mut root_members: Vec<usize> = Vec::new();
    let mut last_container: [Option<Owner>; MAX_LEVEL + 1] = [None; MAX_LEVEL + 1];
    last_container[0] = Some(Owner::Root);

    for (index, heading) in headings.iter().enumerate() {
        if !(1..=6).contains(&heading.level) {
            log::debug!("ignoring heading {index} with level {}", heading.level);
            continue;
        }
        let offset = usize::from(heading.level - base);

        // The root container always exists, so the search ends at level 0 at worst
        let (level, owner) = (0..=offset)
            .rev()
            .find_map(|level| last_container[level].map(|owner| (level, owner)))
            .unwrap_or((0, Owner::Root));
        if level != offset {
            log::debug!(
                "heading {index} (offset {offset}) has no level-{offset} container, joining level {level}"
            );
        }

        let slot = slots.len();
        slots.push(Slot {
            text: heading.text.clone(),
            offset,
            children: Vec::new(),
        });
        match owner {
            Owner::Root => root_members.push(slot),
            Owner::Node(parent) => slots[parent].children.push(slot),
        }
        last_container[offset + 1] = Some(Owner::Node(slot));
    }

    let ids: Vec<String> = (0..slots.len())
        .map(|n| format!("{anchor_prefix}{n}"))
        .collect();

    let mut root = materialize(0, &root_members, &slots, &ids);
    let removed = root.prune();
    log::debug!("pruned {removed} empty containers");

    let anchors = headings
        .iter()
        .enumerate()
        .filter(|(_, h)| (1..=6).contains(&h.level))
        .zip(&ids)
        .map(|((heading_index, _), id)| Anchor {
            heading_index,
            id: id.clone(),
        })
        .collect();

    Some(TocBuild {
        tree: TocTree {
            base_level: base,
            root,
        },
        anchors,
    })
}

fn materialize(level: usize, members: &[usize], slots: &[Slot], ids: &[String]) -> TocList {
    let nodes = members
        .iter()
        .map(|&slot| {
            let entry = &slots[slot];
            TocNode {
                id: ids[slot].clone(),
                text: entry.text.clone(),
                offset: entry.offset,
                children: Some(materialize(entry.offset + 1, &entry.children, slots, ids)),
            }
        })
        .collect();
    TocList { level, nodes }
}

#[cfg(test)]
#[path = "tests/toc.rs"]
mod tests;

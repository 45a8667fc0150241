//! Ownership trees: which component owns which.
//!
//! Nodes are keyed by component id. Components without an id get a
//! synthetic key that is unique for the life of the process, so they never
//! collide with each other across merges.

mod builder;
mod render;

pub use builder::build_tree;
pub use render::render;

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tracing::warn;

use crate::component::Component;

static NEXT_ANONYMOUS: AtomicU64 = AtomicU64::new(0);

/// Identity of a node within an [`OwnershipTree`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKey {
    Id(String),
    Anonymous(u64),
}

impl NodeKey {
    /// Key for a component: its id, or a fresh synthetic key when empty.
    pub fn for_component(component: &Component<'_>) -> Self {
        if component.id.is_empty() {
            NodeKey::anonymous()
        } else {
            NodeKey::Id(component.id.clone())
        }
    }

    fn anonymous() -> Self {
        NodeKey::Anonymous(NEXT_ANONYMOUS.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// A component together with the components it owns.
#[derive(Debug, Clone)]
pub struct TreeNode<'a> {
    pub component: Component<'a>,
    pub children: OwnershipTree<'a>,
}

#[derive(Debug, Clone, Default)]
pub struct OwnershipTree<'a> {
    nodes: BTreeMap<NodeKey, TreeNode<'a>>,
}

impl<'a> OwnershipTree<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a component with an empty subtree and return that subtree.
    /// A component whose id is already present gets a synthetic key, so
    /// both nodes and their subtrees are kept.
    pub fn insert(&mut self, component: Component<'a>) -> &mut OwnershipTree<'a> {
        let mut key = NodeKey::for_component(&component);
        if self.nodes.contains_key(&key) {
            warn!(id = %component.id, "duplicate component id, keeping both");
            key = NodeKey::anonymous();
        }

        let node = TreeNode {
            component,
            children: OwnershipTree::new(),
        };
        &mut self.nodes.entry(key).or_insert(node).children
    }

    /// Shallow union of top-level keys. On collision the node from `other`
    /// wins, subtree included.
    pub fn merge(&mut self, other: OwnershipTree<'a>) {
        self.nodes.extend(other.nodes);
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, key: &NodeKey) -> Option<&TreeNode<'a>> {
        self.nodes.get(key)
    }

    /// Find a node by component id at any depth.
    pub fn find(&self, id: &str) -> Option<&TreeNode<'a>> {
        self.find_key(&NodeKey::Id(id.to_string()))
    }

    fn find_key(&self, key: &NodeKey) -> Option<&TreeNode<'a>> {
        if let Some(node) = self.nodes.get(key) {
            return Some(node);
        }
        self.nodes.values().find_map(|node| node.children.find_key(key))
    }

    /// Top-level nodes in display order: by kind, then name, then key.
    pub fn nodes(&self) -> Vec<&TreeNode<'a>> {
        let mut entries: Vec<_> = self.nodes.iter().collect();
        entries.sort_by(|(ka, a), (kb, b)| compare(a, b).then_with(|| ka.cmp(kb)));
        entries.into_iter().map(|(_, node)| node).collect()
    }

    /// Total number of nodes at every depth.
    pub fn count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| 1 + node.children.count())
            .sum()
    }

    /// Ids of every component at every depth. Empty ids are left out.
    pub fn ids(&self) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut BTreeSet<String>) {
        for node in self.nodes.values() {
            if !node.component.id.is_empty() {
                ids.insert(node.component.id.clone());
            }
            node.children.collect_ids(ids);
        }
    }

    /// Render as box-drawing lines, the top level without connectors.
    pub fn render(&self) -> Vec<String> {
        render(self, true, "")
    }
}

fn compare(a: &TreeNode<'_>, b: &TreeNode<'_>) -> Ordering {
    a.component
        .kind
        .cmp(&b.component.kind)
        .then_with(|| a.component.name.cmp(&b.component.name))
}

impl fmt::Display for OwnershipTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.render() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

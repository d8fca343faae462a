//! Filter flattener
//!
//! Converts a compiled filter tree into a flat map from dotted field path to
//! operator leaf. Element-match operands are already flat sub-filters, so
//! flattening never descends past them.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::ast::{FilterNode, OperatorLeaf};

/// Dotted path → operator leaf, evaluated as a conjunction
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlatFilter {
    entries: BTreeMap<String, OperatorLeaf>,
}

impl FlatFilter {
    /// Creates an empty flat filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a compiled tree.
    ///
    /// A leaf at the root (only possible inside an element match) is keyed by
    /// the empty path and applies to the element itself.
    pub fn from_node(node: &FilterNode) -> Self {
        let mut flat = Self::new();
        flatten_into(node, &mut Vec::new(), &mut flat);
        flat
    }

    /// Adds a leaf; operators on an already present path are appended.
    pub fn insert(&mut self, path: impl Into<String>, leaf: OperatorLeaf) {
        match self.entries.entry(path.into()) {
            Entry::Occupied(mut existing) => existing.get_mut().extend(leaf),
            Entry::Vacant(slot) => {
                slot.insert(leaf);
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&OperatorLeaf> {
        self.entries.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OperatorLeaf)> {
        self.entries.iter().map(|(path, leaf)| (path.as_str(), leaf))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The only entry, if there is exactly one
    pub fn sole_entry(&self) -> Option<(&str, &OperatorLeaf)> {
        if self.entries.len() != 1 {
            return None;
        }
        self.iter().next()
    }

    /// Re-nests the flat filter into a tree.
    ///
    /// `FlatFilter::from_node(&flat.to_tree()) == flat` holds for every flat
    /// filter. When one path extends a path that already holds a leaf, the
    /// longer path stays a single dotted segment under the leaf's parent.
    /// An empty path alone becomes a root leaf; next to other paths it is a
    /// child keyed by `""`.
    pub fn to_tree(&self) -> FilterNode {
        if let Some(("", leaf)) = self.sole_entry() {
            return FilterNode::Leaf(leaf.clone());
        }

        let mut root = BTreeMap::new();
        for (path, leaf) in &self.entries {
            insert_path(&mut root, path, leaf.clone());
        }
        FilterNode::Path(root)
    }
}

impl IntoIterator for FlatFilter {
    type Item = (String, OperatorLeaf);
    type IntoIter = std::collections::btree_map::IntoIter<String, OperatorLeaf>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn flatten_into(node: &FilterNode, path: &mut Vec<String>, flat: &mut FlatFilter) {
    match node {
        FilterNode::Leaf(leaf) => {
            if !leaf.is_empty() {
                flat.insert(path.join("."), leaf.clone());
            }
        }
        FilterNode::Path(children) => {
            for (segment, child) in children {
                path.push(segment.clone());
                flatten_into(child, path, flat);
                path.pop();
            }
        }
    }
}

fn insert_path(children: &mut BTreeMap<String, FilterNode>, path: &str, leaf: OperatorLeaf) {
    let Some((head, rest)) = path.split_once('.') else {
        match children.entry(path.to_string()) {
            // Sorted iteration visits a prefix before its extensions, so a
            // path node can never already sit where a leaf goes.
            Entry::Occupied(mut existing) => {
                if let FilterNode::Leaf(current) = existing.get_mut() {
                    current.extend(leaf);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(FilterNode::Leaf(leaf));
            }
        }
        return;
    };

    if matches!(children.get(head), Some(FilterNode::Leaf(_))) {
        children.insert(path.to_string(), FilterNode::Leaf(leaf));
        return;
    }

    if let FilterNode::Path(grandchildren) = children
        .entry(head.to_string())
        .or_insert_with(|| FilterNode::Path(BTreeMap::new()))
    {
        insert_path(grandchildren, rest, leaf);
    }
}

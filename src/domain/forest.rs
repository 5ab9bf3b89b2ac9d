//! Arena-based forest structure for cost-center hierarchies.

use std::collections::HashMap;

use generational_arena::{Arena, Index};

use crate::domain::entities::Node;

/// Tree node in the arena: a tagged payload plus an ordered child list.
#[derive(Debug)]
pub struct TreeNode {
    /// Validated cost-center record for this node
    pub data: Node,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes, in insertion order
    pub children: Vec<Index>,
}

/// Arena-based forest of disjoint cost-center trees.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Root order and sibling order both follow insertion order, which the
/// builder derives from first-seen row order, so traversal is deterministic.
#[derive(Debug, Default)]
pub struct Forest {
    arena: Arena<TreeNode>,
    roots: Vec<Index>,
    by_id: HashMap<String, Index>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent`, or as a new root when `parent` is None.
    /// Returns the existing index unchanged if the id is already present.
    pub fn insert_node(&mut self, data: Node, parent: Option<Index>) -> Index {
        if let Some(&idx) = self.by_id.get(&data.id) {
            return idx;
        }

        let id = data.id.clone();
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }

        self.by_id.insert(id, node_idx);
        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Look up a node index by cost-center id.
    pub fn find(&self, id: &str) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    /// Root indices in first-seen order.
    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Depth-first pre-order iterator over the whole forest, parents before
    /// children, siblings left to right.
    pub fn iter(&self) -> PreOrderIterator {
        PreOrderIterator::new(self)
    }

    /// Maximum depth over all trees (empty forest has depth 0).
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }
}

pub struct PreOrderIterator<'a> {
    forest: &'a Forest,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        // Roots pushed in reverse so the first-seen root pops first
        let stack = forest.roots.iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

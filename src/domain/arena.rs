use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::TreeNode;

/// Node slot in the arena-based forest.
#[derive(Debug)]
pub struct ArenaNode {
    /// Menu node without its children; those live in `children`
    pub data: TreeNode,
    /// Index of parent node in the arena, None for top-level nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

/// Arena-based forest used while assembling a menu without recursion.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Top-level nodes are kept in insertion order.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<ArenaNode>,
    /// Indices of the top-level nodes
    roots: Vec<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    pub fn insert_node(&mut self, data: TreeNode, parent: Option<Index>) -> Index {
        let node = ArenaNode {
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

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Levels of the deepest branch; 0 for an empty forest.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(Index, usize)> = self.roots.iter().map(|&r| (r, 1)).collect();
        while let Some((idx, level)) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                deepest = deepest.max(level);
                stack.extend(node.children.iter().map(|&c| (c, level + 1)));
            }
        }
        deepest
    }

    /// Consume the arena into owned nested nodes.
    ///
    /// Children are attached bottom-up in post-order, so no recursion is
    /// needed regardless of depth.
    #[instrument(level = "debug", skip(self), fields(nodes = self.arena.len()))]
    pub fn into_nodes(mut self) -> Vec<TreeNode> {
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        let mut finished: HashMap<Index, TreeNode> = HashMap::with_capacity(order.len());

        for idx in order {
            if let Some(node) = self.arena.remove(idx) {
                let mut item = node.data;
                item.children = node
                    .children
                    .iter()
                    .filter_map(|child| finished.remove(child))
                    .collect();
                finished.insert(idx, item);
            }
        }

        self.roots
            .iter()
            .filter_map(|root| finished.remove(root))
            .collect()
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        // Reverse so the first root is visited first
        let stack = arena.roots.iter().rev().map(|&r| (r, false)).collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

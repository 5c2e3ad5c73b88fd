//! Indexed tree builder: `parent_id -> children` index plus explicit stack.
//!
//! Unlike the forward scan this places every record reachable from the root
//! regardless of input order. Recursion depth is constant.

use std::collections::BTreeMap;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::TreeArena;
use crate::domain::collaborators::{AccessCheck, Translate};
use crate::domain::entities::{FlatRecord, MenuMode, RecordId, TreeNode};
use crate::domain::node::NodeFactory;

/// Positions of each parent's children, in input order.
#[derive(Debug)]
pub struct RecordIndex<'r, I> {
    children: BTreeMap<&'r I, Vec<usize>>,
}

impl<'r, I: RecordId> RecordIndex<'r, I> {
    /// Single linear pass over `records`.
    pub fn new(records: &'r [FlatRecord<I>]) -> Self {
        let mut children: BTreeMap<&'r I, Vec<usize>> = BTreeMap::new();
        for (pos, record) in records.iter().enumerate() {
            children.entry(&record.parent_id).or_default().push(pos);
        }
        Self { children }
    }

    /// Positions of the records naming `parent` as their parent.
    pub fn children(&self, parent: &I) -> &[usize] {
        self.children.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct parent ids seen.
    pub fn parent_count(&self) -> usize {
        self.children.len()
    }

    /// Levels of the deepest branch below `root`, each record counted once.
    ///
    /// Walks the index with an explicit stack, so it is safe to call before
    /// any recursive assembly or rendering.
    pub fn depth_below(&self, records: &[FlatRecord<I>], root: &I) -> usize {
        let mut seen = vec![false; records.len()];
        let mut deepest = 0;
        let mut stack: Vec<(usize, usize)> =
            self.children(root).iter().map(|&pos| (pos, 1)).collect();

        while let Some((pos, level)) = stack.pop() {
            if std::mem::replace(&mut seen[pos], true) {
                continue;
            }
            deepest = deepest.max(level);
            stack.extend(
                self.children(&records[pos].id)
                    .iter()
                    .map(|&child| (child, level + 1)),
            );
        }
        deepest
    }
}

/// Builds menu trees from records in any order.
pub struct TreeBuilder<'c, E> {
    factory: NodeFactory<'c, E>,
}

impl<'c, E> TreeBuilder<'c, E> {
    pub fn new(
        mode: MenuMode,
        access: &'c dyn AccessCheck<E>,
        translator: &'c dyn Translate<E>,
    ) -> Self {
        Self {
            factory: NodeFactory::new(mode, access, translator),
        }
    }

    /// Build the forest below `root`.
    ///
    /// Records not reachable from `root` (orphans, detached cycles) are left
    /// out. A record reached a second time through a cycle or a duplicate id
    /// is placed only once.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build<I: RecordId>(
        &self,
        records: &[FlatRecord<I>],
        root: &I,
    ) -> Result<Vec<TreeNode>, E> {
        let index = RecordIndex::new(records);
        debug!(parents = index.parent_count(), "indexed records");

        let mut tree = TreeArena::new();
        let mut placed = vec![false; records.len()];

        // Reverse pushes so siblings pop in input order
        let mut stack: Vec<(usize, Option<Index>)> = index
            .children(root)
            .iter()
            .rev()
            .map(|&pos| (pos, None))
            .collect();

        while let Some((pos, parent)) = stack.pop() {
            if std::mem::replace(&mut placed[pos], true) {
                warn!(id = %records[pos].id, "record reached twice, skipping");
                continue;
            }

            let record = &records[pos];
            let node = self.factory.build(record)?;
            let node_idx = tree.insert_node(node, parent);

            for &child in index.children(&record.id).iter().rev() {
                stack.push((child, Some(node_idx)));
            }
        }

        let unreachable = placed.iter().filter(|&&p| !p).count();
        if unreachable > 0 {
            debug!(unreachable, "records not reachable from root were skipped");
        }
        let (nodes, depth) = (tree.len(), tree.depth());
        debug!(nodes, depth, "assembled arena");

        Ok(tree.into_nodes())
    }
}

//! Forward-scan tree materializer.
//!
//! Walks a slice of records once per level and collects, for the given
//! parent, every later record that names it as parent. Children must appear
//! after their parent in the slice; records sorted by `parent_id` (with ids
//! growing downwards) and depth-first ordered records both satisfy this.
//! Inputs violating it produce a partial tree, never an error.
//!
//! Use [`crate::domain::TreeBuilder`] when the input order is not under
//! control.

use tracing::{debug, instrument};

use crate::domain::collaborators::{AccessCheck, Translate};
use crate::domain::entities::{FlatRecord, MenuMode, RecordId, TreeNode};
use crate::domain::node::NodeFactory;

/// Recursive scan over a record slice.
pub struct Materializer<'c, E> {
    factory: NodeFactory<'c, E>,
}

impl<'c, E> Materializer<'c, E> {
    pub fn new(
        mode: MenuMode,
        access: &'c dyn AccessCheck<E>,
        translator: &'c dyn Translate<E>,
    ) -> Self {
        Self {
            factory: NodeFactory::new(mode, access, translator),
        }
    }

    /// Collect the direct children of `current_parent_id` found at or after
    /// `start_index`, each with its own subtree.
    ///
    /// Returns the children in input order and the index just past the last
    /// record placed in the returned forest (`start_index` if none was).
    pub fn materialize<I: RecordId>(
        &self,
        records: &[FlatRecord<I>],
        start_index: usize,
        current_parent_id: &I,
    ) -> Result<(Vec<TreeNode>, usize), E> {
        let mut nodes = Vec::new();
        let mut next_index = start_index;

        for (cursor, record) in records.iter().enumerate().skip(start_index) {
            if record.parent_id != *current_parent_id {
                continue;
            }
            let mut node = self.factory.build(record)?;
            let (children, child_end) = self.materialize(records, cursor + 1, &record.id)?;
            node.children = children;
            next_index = next_index.max(child_end).max(cursor + 1);
            nodes.push(node);
        }

        Ok((nodes, next_index))
    }

    /// Materialize the whole slice below `root`.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn materialize_tree<I: RecordId>(
        &self,
        records: &[FlatRecord<I>],
        root: &I,
    ) -> Result<Vec<TreeNode>, E> {
        let (nodes, consumed) = self.materialize(records, 0, root)?;
        debug!(
            top_level = nodes.len(),
            consumed,
            mode = %self.factory.mode(),
            "materialized menu tree"
        );
        Ok(nodes)
    }
}

/// One-shot form of [`Materializer::materialize`].
pub fn materialize<I: RecordId, E>(
    records: &[FlatRecord<I>],
    start_index: usize,
    current_parent_id: &I,
    mode: MenuMode,
    access: &dyn AccessCheck<E>,
    translator: &dyn Translate<E>,
) -> Result<(Vec<TreeNode>, usize), E> {
    Materializer::new(mode, access, translator).materialize(records, start_index, current_parent_id)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::domain::collaborators::{AllowAll, Identity};

    fn names(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.label.as_str()).collect()
    }

    #[test]
    fn given_parent_sorted_rows_when_materializing_then_nests_children() {
        let records = vec![
            FlatRecord::new(1, 0, "Home"),
            FlatRecord::new(3, 0, "About"),
            FlatRecord::new(2, 1, "Profile"),
            FlatRecord::new(4, 3, "Team"),
            FlatRecord::new(5, 3, "Jobs"),
        ];
        let scan: Materializer<Infallible> =
            Materializer::new(MenuMode::Native, &AllowAll, &Identity);

        let (nodes, next) = scan.materialize(&records, 0, &0).unwrap();

        assert_eq!(names(&nodes), vec!["Home", "About"]);
        assert_eq!(names(&nodes[0].children), vec!["Profile"]);
        assert_eq!(names(&nodes[1].children), vec!["Team", "Jobs"]);
        assert_eq!(next, 5);
    }

    #[test]
    fn given_start_index_at_end_when_materializing_then_unchanged() {
        let records = vec![FlatRecord::new(1, 0, "Home")];
        let scan: Materializer<Infallible> =
            Materializer::new(MenuMode::Native, &AllowAll, &Identity);

        let (nodes, next) = scan.materialize(&records, 1, &0).unwrap();

        assert!(nodes.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn given_child_before_parent_when_materializing_then_child_is_dropped() {
        let records = vec![FlatRecord::new(2, 1, "Orphaned"), FlatRecord::new(1, 0, "Home")];
        let scan: Materializer<Infallible> =
            Materializer::new(MenuMode::Native, &AllowAll, &Identity);

        let nodes = scan.materialize_tree(&records, &0).unwrap();

        assert_eq!(names(&nodes), vec!["Home"]);
        assert!(nodes[0].is_leaf());
    }
}

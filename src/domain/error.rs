//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Precondition violations found by [`crate::domain::validate`] and the
/// depth limit enforced before assembly.
///
/// The materializer itself never produces these; ids are carried in their
/// display form so the error stays independent of the id type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate record id: {id}")]
    DuplicateId { id: String },

    #[error("record {id} is its own parent")]
    SelfReference { id: String },

    #[error("records not grouped by parent: row {index} has parent {parent_id} after parent {previous}")]
    Unsorted {
        index: usize,
        parent_id: String,
        previous: String,
    },

    #[error("row {index} references unknown parent {parent_id}")]
    OrphanReference { index: usize, parent_id: String },

    #[error("row {index} precedes its parent {parent_id}")]
    ParentAfterChild { index: usize, parent_id: String },

    #[error("menu is {depth} levels deep, limit is {max_depth}")]
    TooDeep { depth: usize, max_depth: usize },
}

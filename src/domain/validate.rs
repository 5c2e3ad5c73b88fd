//! Opt-in precondition checks for record slices.

use std::collections::BTreeMap;

use tracing::instrument;

use crate::domain::entities::{FlatRecord, RecordId};
use crate::domain::error::DomainError;

/// Check that `records` are fit for the forward scan below `root`.
///
/// Fails on the first violation, in this order per row: duplicate id,
/// self reference, `parent_id` lower than the previous row's. Parent
/// references are checked after all ids are known: an unknown parent is an
/// orphan, a parent listed at a later row would be missed by the scan.
#[instrument(level = "debug", skip(records), fields(records = records.len()))]
pub fn validate<I: RecordId>(records: &[FlatRecord<I>], root: &I) -> Result<(), DomainError> {
    let mut positions: BTreeMap<&I, usize> = BTreeMap::new();
    let mut previous: Option<&I> = None;

    for (index, record) in records.iter().enumerate() {
        if positions.insert(&record.id, index).is_some() {
            return Err(DomainError::DuplicateId {
                id: record.id.to_string(),
            });
        }
        if record.parent_id == record.id {
            return Err(DomainError::SelfReference {
                id: record.id.to_string(),
            });
        }
        if let Some(prev) = previous {
            if record.parent_id < *prev {
                return Err(DomainError::Unsorted {
                    index,
                    parent_id: record.parent_id.to_string(),
                    previous: prev.to_string(),
                });
            }
        }
        previous = Some(&record.parent_id);
    }

    for (index, record) in records.iter().enumerate() {
        if record.parent_id == *root {
            continue;
        }
        match positions.get(&record.parent_id) {
            None => {
                return Err(DomainError::OrphanReference {
                    index,
                    parent_id: record.parent_id.to_string(),
                })
            }
            Some(&parent_index) if parent_index > index => {
                return Err(DomainError::ParentAfterChild {
                    index,
                    parent_id: record.parent_id.to_string(),
                })
            }
            Some(_) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_parent_sorted_records_when_validating_then_ok() {
        let records = vec![
            FlatRecord::new(1, 0, "Home"),
            FlatRecord::new(3, 0, "About"),
            FlatRecord::new(2, 1, "Profile"),
        ];
        assert_eq!(validate(&records, &0), Ok(()));
    }

    #[test]
    fn given_empty_records_when_validating_then_ok() {
        let records: Vec<FlatRecord> = Vec::new();
        assert_eq!(validate(&records, &0), Ok(()));
    }
}

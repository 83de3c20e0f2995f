//! Access partition over a set of dataset ids.

use crate::dataset_id::DatasetId;
use serde::{Deserialize, Serialize};

/// Result of validating access to a set of datasets.
///
/// Invariants: every input id appears on exactly one side, the sides are
/// disjoint, and each side preserves caller input order (not validation
/// completion order).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessPartition {
    /// Datasets the credentials can reach
    pub accessible: Vec<DatasetId>,

    /// Datasets that failed the access check for any reason
    pub inaccessible: Vec<DatasetId>,
}

impl AccessPartition {
    /// Partition `(id, accessible)` pairs, preserving input order.
    pub fn from_results(results: impl IntoIterator<Item = (DatasetId, bool)>) -> Self {
        let mut partition = AccessPartition::default();
        for (id, ok) in results {
            if ok {
                partition.accessible.push(id);
            } else {
                partition.inaccessible.push(id);
            }
        }
        partition
    }

    /// Partition that deems every input accessible.
    ///
    /// Used for warehouse kinds that have no per-dataset access model.
    pub fn identity(ids: &[DatasetId]) -> Self {
        Self {
            accessible: ids.to_vec(),
            inaccessible: Vec::new(),
        }
    }

    /// Total number of ids across both sides.
    pub fn len(&self) -> usize {
        self.accessible.len() + self.inaccessible.len()
    }

    /// Whether the partition covers no ids at all.
    pub fn is_empty(&self) -> bool {
        self.accessible.is_empty() && self.inaccessible.is_empty()
    }
}

#[cfg(test)]
#[path = "partition_test.rs"]
mod tests;

//! Per-dataset access validation

use crate::api::DatasetApi;
use dock_core::{AccessPartition, DatasetId};
use futures::future::join_all;

/// Validates access to individual datasets.
///
/// Validation never errors: any failure — permission, not-found, network,
/// timeout — means "not accessible" and is logged at debug level only.
pub struct AccessValidator<'a, A: DatasetApi> {
    api: &'a A,
}

impl<'a, A: DatasetApi> AccessValidator<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Check access to a single dataset.
    pub async fn validate_one(&self, project_id: &str, dataset_id: &DatasetId) -> bool {
        match self.api.get_dataset(project_id, dataset_id.as_str()).await {
            Ok(_) => true,
            Err(e) => {
                log::debug!("dataset '{}' not accessible: {}", dataset_id, e);
                false
            }
        }
    }

    /// Check access to many datasets concurrently and partition the ids.
    ///
    /// Both sides of the partition preserve the caller's input order, not
    /// validation completion order.
    pub async fn validate_many(
        &self,
        project_id: &str,
        dataset_ids: &[DatasetId],
    ) -> AccessPartition {
        let checks = dataset_ids.iter().map(|id| async move {
            let ok = self.validate_one(project_id, id).await;
            (id.clone(), ok)
        });

        let partition = AccessPartition::from_results(join_all(checks).await);
        if !partition.inaccessible.is_empty() {
            log::warn!(
                "{}/{} datasets not accessible in project {}",
                partition.inaccessible.len(),
                dataset_ids.len(),
                project_id
            );
        }
        partition
    }
}

#[cfg(test)]
#[path = "access_test.rs"]
mod tests;

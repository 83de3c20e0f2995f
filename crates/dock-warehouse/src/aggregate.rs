//! Multi-dataset table aggregation
//!
//! Fetches per-dataset table listings concurrently and merges them into a
//! single catalog with provenance. The policy is all-settle: a dataset that
//! fails to list contributes zero tables and a warning, never an abort of
//! its siblings. Only when every dataset fails does the caller see an empty
//! catalog, which it must treat as a degraded state rather than an error.

use crate::error::{ProviderError, ProviderResult};
use crate::traits::MetadataProvider;
use dock_core::{CompactTable, ConnectionInfo, DatasetId};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Knobs for aggregation requests.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Timeout applied to each per-dataset listing call
    pub request_timeout: Duration,

    /// Upper bound on concurrent per-dataset requests
    pub max_concurrent_requests: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_concurrent_requests: 8,
        }
    }
}

/// List tables across a set of datasets, tagging each table with its source
/// dataset.
///
/// For warehouse kinds without dataset discovery the call degrades to a
/// single ungrouped listing and `dataset_ids` is ignored. Output order
/// follows the caller-supplied dataset order, never completion order.
pub async fn list_tables_across_datasets(
    provider: &dyn MetadataProvider,
    base: &ConnectionInfo,
    dataset_ids: &[DatasetId],
    options: &AggregateOptions,
) -> Vec<CompactTable> {
    if !provider.kind().supports_dataset_discovery() {
        return match fetch_with_timeout(provider, base, options.request_timeout).await {
            Ok(tables) => tables,
            Err(e) => {
                log::warn!(
                    "table listing failed for {} source: {}",
                    provider.kind().as_str(),
                    e
                );
                Vec::new()
            }
        };
    }

    let semaphore = Arc::new(Semaphore::new(options.max_concurrent_requests));
    let fetches = dataset_ids.iter().map(|id| {
        let conn = base.with_dataset(id.clone());
        let semaphore = Arc::clone(&semaphore);
        async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(_) => return (id, Err(ProviderError::QueryError("cancelled".to_string()))),
            };
            let result = fetch_with_timeout(provider, &conn, options.request_timeout).await;
            (id, result)
        }
    });

    let mut merged = Vec::new();
    let mut failed = 0usize;
    // join_all preserves input order, so the merged catalog groups tables
    // by dataset in the caller's order.
    for (id, result) in join_all(fetches).await {
        match result {
            Ok(tables) => {
                merged.extend(tables.into_iter().map(|t| t.tagged(id.clone())));
            }
            Err(e) => {
                failed += 1;
                log::warn!("skipping dataset '{}': table listing failed: {}", id, e);
            }
        }
    }

    if failed > 0 {
        log::warn!(
            "aggregated tables from {}/{} datasets ({} failed)",
            dataset_ids.len() - failed,
            dataset_ids.len(),
            failed
        );
    }

    merged
}

async fn fetch_with_timeout(
    provider: &dyn MetadataProvider,
    conn: &ConnectionInfo,
    timeout: Duration,
) -> ProviderResult<Vec<CompactTable>> {
    match tokio::time::timeout(timeout, provider.list_tables(conn)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout {
            seconds: timeout.as_secs(),
        }),
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;

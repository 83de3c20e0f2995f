//! Dataset discovery
//!
//! Enumerates the datasets a credential can see in a project and enriches
//! each with extended metadata. The enumeration call is the only hard
//! failure point; per-dataset metadata fetches follow a partial-success
//! policy and degrade to id-only records.

use crate::api::DatasetApi;
use crate::error::ApiError;
use crate::rest::{ClientOptions, RestClient};
use crate::token::TokenProvider;
use dock_core::{
    credentials, DatasetInfo, DiscoveryError, DiscoveryErrorCode, DiscoveryResult,
};
use futures::future::join_all;
use std::sync::Arc;

/// Map an API error onto the discovery error taxonomy.
///
/// The status-code table is part of the external contract: permission
/// problems (403) and unknown failures are recoverable via manual dataset
/// entry; authentication (401) and project (404) problems require fixed
/// input.
pub fn map_api_error(err: &ApiError) -> DiscoveryError {
    let code = match err.status_code() {
        Some(403) => DiscoveryErrorCode::InsufficientPermissions,
        Some(401) => DiscoveryErrorCode::AuthenticationFailed,
        Some(404) => DiscoveryErrorCode::ProjectNotFound,
        _ => DiscoveryErrorCode::DiscoveryFailed,
    };
    DiscoveryError::new(code, err.to_string())
}

/// Dataset discovery over any [`DatasetApi`] implementation.
pub struct DiscoveryClient<A: DatasetApi> {
    api: A,
}

impl<A: DatasetApi> DiscoveryClient<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Borrow the underlying API client.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Enumerate datasets and fetch their metadata concurrently.
    ///
    /// Failures land in the `success:false` branch of the result; this
    /// method itself never errors. A project with zero datasets is a
    /// successful, empty discovery.
    pub async fn discover(&self, project_id: &str) -> DiscoveryResult {
        let entries = match self.api.list_datasets(project_id).await {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("dataset enumeration failed for project {}: {}", project_id, e);
                return DiscoveryResult::failure(map_api_error(&e));
            }
        };

        // All-settle metadata fetch; output keeps the listing order.
        let fetches = entries.iter().map(|entry| {
            let dataset_id = entry.dataset_reference.dataset_id.clone();
            async move {
                match self.api.get_dataset(project_id, &dataset_id).await {
                    Ok(metadata) => metadata.into_info(),
                    Err(e) => {
                        log::debug!(
                            "metadata fetch failed for dataset '{}', keeping id only: {}",
                            dataset_id,
                            e
                        );
                        DatasetInfo::id_only(dock_core::DatasetId::new(dataset_id))
                    }
                }
            }
        });

        let datasets = join_all(fetches).await;
        log::debug!(
            "discovered {} datasets in project {}",
            datasets.len(),
            project_id
        );
        DiscoveryResult::success(datasets)
    }
}

/// End-to-end discovery entry point: decode credentials, build a REST
/// client scoped to them, and run discovery.
pub async fn discover(
    project_id: &str,
    raw_credentials: &str,
    token_provider: Arc<dyn TokenProvider>,
    options: &ClientOptions,
) -> DiscoveryResult {
    let creds = match credentials::decode(raw_credentials) {
        Ok(creds) => creds,
        Err(e) => {
            return DiscoveryResult::failure(DiscoveryError::new(
                DiscoveryErrorCode::InvalidCredentials,
                e.to_string(),
            ))
        }
    };

    let api = match RestClient::new(creds, token_provider, options) {
        Ok(api) => api,
        Err(e) => {
            return DiscoveryResult::failure(DiscoveryError::new(
                DiscoveryErrorCode::DiscoveryFailed,
                e.to_string(),
            ))
        }
    };

    DiscoveryClient::new(api).discover(project_id).await
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;

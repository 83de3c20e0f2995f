//! Backend port for the setup flow
//!
//! The orchestrator sequences discovery, validation, and aggregation
//! without knowing how any of them are performed. `SetupBackend` is that
//! seam; `BigQueryBackend` wires it to the real discovery client and
//! aggregator, `ProviderBackend` covers warehouses without a dataset
//! discovery model.

use async_trait::async_trait;
use dock_bigquery::{
    discovery, AccessValidator, BigQueryProvider, ClientOptions, RestClient, TokenProvider,
};
use dock_core::{
    credentials, AccessPartition, CompactTable, ConnectionInfo, DataSourceKind, DatasetId,
    DiscoveryResult,
};
use dock_warehouse::{list_tables_across_datasets, AggregateOptions, MetadataProvider};
use std::sync::Arc;

/// Connection input captured when the user creates a connection.
///
/// Credentials stay inside this value for the lifetime of one flow and are
/// never cached elsewhere.
#[derive(Clone)]
pub struct ConnectionParams {
    /// Cloud project id (empty for local warehouses)
    pub project_id: String,

    /// Raw credentials blob (empty for local warehouses)
    pub credentials: String,
}

impl ConnectionParams {
    pub fn new(project_id: impl Into<String>, credentials: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            credentials: credentials.into(),
        }
    }

    /// Params for a warehouse that needs neither project nor credentials.
    pub fn local() -> Self {
        Self::new("", "")
    }
}

/// Warehouse operations the orchestrator depends on.
#[async_trait]
pub trait SetupBackend: Send + Sync {
    /// Warehouse kind behind this backend
    fn kind(&self) -> DataSourceKind;

    /// Enumerate datasets (BigQuery-style warehouses only)
    async fn discover(&self, conn: &ConnectionParams) -> DiscoveryResult;

    /// Partition dataset ids by accessibility
    async fn validate(&self, conn: &ConnectionParams, ids: &[DatasetId]) -> AccessPartition;

    /// Aggregate table listings across datasets
    async fn list_tables(&self, conn: &ConnectionParams, ids: &[DatasetId]) -> Vec<CompactTable>;
}

/// Real BigQuery backend: REST discovery, access validation, and
/// multi-dataset aggregation.
pub struct BigQueryBackend {
    token_provider: Arc<dyn TokenProvider>,
    client_options: ClientOptions,
    aggregate_options: AggregateOptions,
}

impl BigQueryBackend {
    pub fn new(
        token_provider: Arc<dyn TokenProvider>,
        client_options: ClientOptions,
        aggregate_options: AggregateOptions,
    ) -> Self {
        Self {
            token_provider,
            client_options,
            aggregate_options,
        }
    }

    /// Build a REST client scoped to this connection's credentials.
    fn build_api(&self, conn: &ConnectionParams) -> Option<RestClient> {
        let creds = match credentials::decode(&conn.credentials) {
            Ok(creds) => creds,
            Err(e) => {
                log::debug!("credential decode failed: {}", e);
                return None;
            }
        };
        match RestClient::new(creds, Arc::clone(&self.token_provider), &self.client_options) {
            Ok(api) => Some(api),
            Err(e) => {
                log::debug!("client construction failed: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl SetupBackend for BigQueryBackend {
    fn kind(&self) -> DataSourceKind {
        DataSourceKind::BigQuery
    }

    async fn discover(&self, conn: &ConnectionParams) -> DiscoveryResult {
        discovery::discover(
            &conn.project_id,
            &conn.credentials,
            Arc::clone(&self.token_provider),
            &self.client_options,
        )
        .await
    }

    async fn validate(&self, conn: &ConnectionParams, ids: &[DatasetId]) -> AccessPartition {
        // Validation never errors: an unusable client means nothing is
        // accessible.
        match self.build_api(conn) {
            Some(api) => {
                AccessValidator::new(&api)
                    .validate_many(&conn.project_id, ids)
                    .await
            }
            None => AccessPartition::from_results(ids.iter().cloned().map(|id| (id, false))),
        }
    }

    async fn list_tables(&self, conn: &ConnectionParams, ids: &[DatasetId]) -> Vec<CompactTable> {
        let Some(api) = self.build_api(conn) else {
            log::warn!("skipping table aggregation: no usable API client");
            return Vec::new();
        };
        let provider = BigQueryProvider::new(api);
        let base = ConnectionInfo {
            project_id: Some(conn.project_id.clone()),
            database: None,
            dataset: None,
        };
        list_tables_across_datasets(&provider, &base, ids, &self.aggregate_options).await
    }
}

/// Backend over a local metadata provider (DuckDB, Postgres).
///
/// These warehouses have no dataset discovery: every dataset is deemed
/// accessible and table listings are ungrouped.
pub struct ProviderBackend {
    provider: Arc<dyn MetadataProvider>,
    base: ConnectionInfo,
    aggregate_options: AggregateOptions,
}

impl ProviderBackend {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        base: ConnectionInfo,
        aggregate_options: AggregateOptions,
    ) -> Self {
        Self {
            provider,
            base,
            aggregate_options,
        }
    }
}

#[async_trait]
impl SetupBackend for ProviderBackend {
    fn kind(&self) -> DataSourceKind {
        self.provider.kind()
    }

    async fn discover(&self, _conn: &ConnectionParams) -> DiscoveryResult {
        // Not part of this warehouse's model; the orchestrator never asks.
        DiscoveryResult::success(Vec::new())
    }

    async fn validate(&self, _conn: &ConnectionParams, ids: &[DatasetId]) -> AccessPartition {
        AccessPartition::identity(ids)
    }

    async fn list_tables(&self, _conn: &ConnectionParams, ids: &[DatasetId]) -> Vec<CompactTable> {
        list_tables_across_datasets(self.provider.as_ref(), &self.base, ids, &self.aggregate_options)
            .await
    }
}

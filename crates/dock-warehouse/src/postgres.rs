//! Postgres metadata provider stub

use crate::error::{ProviderError, ProviderResult};
use crate::traits::{MetadataProvider, TableConstraint};
use async_trait::async_trait;
use dock_core::{CompactTable, ConnectionInfo, DataSourceKind};

/// Postgres metadata provider (stub implementation)
///
/// This is a placeholder for future Postgres support.
pub struct PostgresProvider {
    // Connection details would go here
}

fn not_implemented(feature: &str) -> ProviderError {
    ProviderError::NotImplemented {
        backend: "postgres".to_string(),
        feature: feature.to_string(),
    }
}

impl PostgresProvider {
    /// Create a new Postgres provider (not yet implemented)
    pub fn new(_connection_string: &str) -> ProviderResult<Self> {
        Err(not_implemented("connect"))
    }
}

#[async_trait]
impl MetadataProvider for PostgresProvider {
    async fn list_tables(&self, _conn: &ConnectionInfo) -> ProviderResult<Vec<CompactTable>> {
        Err(not_implemented("list_tables"))
    }

    async fn get_constraints(
        &self,
        _conn: &ConnectionInfo,
    ) -> ProviderResult<Vec<TableConstraint>> {
        Err(not_implemented("get_constraints"))
    }

    async fn get_version(&self) -> ProviderResult<String> {
        Err(not_implemented("get_version"))
    }

    fn kind(&self) -> DataSourceKind {
        DataSourceKind::Postgres
    }
}

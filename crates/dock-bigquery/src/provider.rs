//! BigQuery-backed metadata provider

use crate::api::{DatasetApi, TableMetadata};
use crate::error::ApiError;
use async_trait::async_trait;
use dock_core::{ColumnInfo, CompactTable, ConnectionInfo, DataSourceKind};
use dock_warehouse::{
    ConstraintType, MetadataProvider, ProviderError, ProviderResult, TableConstraint,
};
use futures::future::join_all;

fn map_api_error(dataset: Option<&str>, err: ApiError) -> ProviderError {
    match (err.status_code(), dataset) {
        (Some(404), Some(dataset)) => ProviderError::DatasetUnavailable {
            dataset: dataset.to_string(),
            message: err.to_string(),
        },
        _ => ProviderError::Api(err.to_string()),
    }
}

fn missing(field: &str) -> ProviderError {
    ProviderError::ConnectionError(format!("connection descriptor is missing {}", field))
}

/// [`MetadataProvider`] over the BigQuery REST API.
///
/// Listings require a dataset-scoped connection descriptor; BigQuery has no
/// ungrouped whole-project table listing.
pub struct BigQueryProvider<A: DatasetApi> {
    api: A,
}

impl<A: DatasetApi> BigQueryProvider<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    fn scope<'c>(&self, conn: &'c ConnectionInfo) -> ProviderResult<(&'c str, &'c str)> {
        let project = conn.project_id.as_deref().ok_or_else(|| missing("project_id"))?;
        let dataset = conn
            .dataset
            .as_deref()
            .ok_or_else(|| missing("dataset scope"))?;
        Ok((project, dataset))
    }

    fn to_compact(metadata: TableMetadata) -> CompactTable {
        let columns = metadata
            .schema
            .map(|schema| {
                schema
                    .fields
                    .into_iter()
                    .map(|f| ColumnInfo {
                        nullable: f.is_nullable(),
                        name: f.name,
                        data_type: f.field_type,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let primary_key = metadata
            .table_constraints
            .and_then(|c| c.primary_key)
            .map(|pk| pk.columns);

        CompactTable {
            primary_key,
            ..CompactTable::new(metadata.table_reference.table_id, columns)
        }
    }
}

#[async_trait]
impl<A: DatasetApi> MetadataProvider for BigQueryProvider<A> {
    async fn list_tables(&self, conn: &ConnectionInfo) -> ProviderResult<Vec<CompactTable>> {
        let (project, dataset) = self.scope(conn)?;

        let entries = self
            .api
            .list_tables(project, dataset)
            .await
            .map_err(|e| map_api_error(Some(dataset), e))?;

        // Schemas come from per-table gets, fetched all-settle: a table
        // whose metadata fetch fails is kept with its name only.
        let fetches = entries.iter().map(|entry| {
            let table_id = entry.table_reference.table_id.clone();
            async move {
                match self.api.get_table(project, dataset, &table_id).await {
                    Ok(metadata) => Self::to_compact(metadata),
                    Err(e) => {
                        log::debug!(
                            "schema fetch failed for table '{}.{}': {}",
                            dataset,
                            table_id,
                            e
                        );
                        CompactTable::new(table_id, vec![])
                    }
                }
            }
        });

        Ok(join_all(fetches).await)
    }

    async fn get_constraints(&self, conn: &ConnectionInfo) -> ProviderResult<Vec<TableConstraint>> {
        let tables = self.list_tables(conn).await?;
        Ok(tables
            .into_iter()
            .filter_map(|t| {
                t.primary_key.map(|columns| TableConstraint {
                    table: t.name,
                    constraint_type: ConstraintType::PrimaryKey,
                    columns,
                })
            })
            .collect())
    }

    async fn get_version(&self) -> ProviderResult<String> {
        // The REST API is unversioned beyond its path segment.
        Ok("bigquery-v2".to_string())
    }

    fn kind(&self) -> DataSourceKind {
        DataSourceKind::BigQuery
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;

//! BigQuery REST API surface
//!
//! Wire types mirror the v2 REST representation (camelCase fields,
//! millisecond-epoch timestamps encoded as strings). The `DatasetApi` trait
//! is the seam between discovery/validation logic and the HTTP client, and
//! is what tests replace with an in-memory double.

use crate::error::ApiResult;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use dock_core::{DatasetId, DatasetInfo};
use serde::{Deserialize, Serialize};

/// Reference identifying a dataset within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReference {
    pub project_id: String,
    pub dataset_id: String,
}

/// One entry from `datasets.list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetListEntry {
    pub dataset_reference: DatasetReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Extended metadata from `datasets.get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub dataset_reference: DatasetReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Millisecond epoch, encoded as a string on the wire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,

    /// Millisecond epoch, encoded as a string on the wire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<String>,
}

impl DatasetMetadata {
    /// Convert the wire representation into the core dataset record.
    pub fn into_info(self) -> DatasetInfo {
        DatasetInfo {
            id: DatasetId::new(self.dataset_reference.dataset_id),
            friendly_name: self.friendly_name,
            description: self.description,
            location: self.location,
            creation_time: parse_epoch_millis(self.creation_time.as_deref()),
            last_modified_time: parse_epoch_millis(self.last_modified_time.as_deref()),
        }
    }
}

fn parse_epoch_millis(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let millis: i64 = raw?.parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Reference identifying a table within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

/// One entry from `tables.list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableListEntry {
    pub table_reference: TableReference,

    /// TABLE, VIEW, EXTERNAL, ...
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub table_type: Option<String>,
}

/// Field within a table schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFieldSchema {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: String,

    /// NULLABLE, REQUIRED or REPEATED; absent means NULLABLE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl TableFieldSchema {
    /// Whether this field admits NULLs.
    pub fn is_nullable(&self) -> bool {
        !matches!(self.mode.as_deref(), Some("REQUIRED"))
    }
}

/// Table schema from `tables.get`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

/// Primary-key declaration within table constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryKey {
    #[serde(default)]
    pub columns: Vec<String>,
}

/// Table constraints from `tables.get`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKey>,
}

/// Extended table metadata from `tables.get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    pub table_reference: TableReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_constraints: Option<TableConstraints>,
}

/// Minimal BigQuery API surface consumed by discovery, access validation,
/// and the metadata provider.
#[async_trait]
pub trait DatasetApi: Send + Sync {
    /// `datasets.list` for a project, fully paged
    async fn list_datasets(&self, project_id: &str) -> ApiResult<Vec<DatasetListEntry>>;

    /// `datasets.get` for one dataset
    async fn get_dataset(&self, project_id: &str, dataset_id: &str) -> ApiResult<DatasetMetadata>;

    /// `tables.list` for one dataset, fully paged
    async fn list_tables(&self, project_id: &str, dataset_id: &str)
        -> ApiResult<Vec<TableListEntry>>;

    /// `tables.get` for one table
    async fn get_table(
        &self,
        project_id: &str,
        dataset_id: &str,
        table_id: &str,
    ) -> ApiResult<TableMetadata>;
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

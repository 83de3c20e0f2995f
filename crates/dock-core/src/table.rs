//! Compact table metadata used for table selection.

use crate::dataset_id::DatasetId;
use serde::{Deserialize, Serialize};

/// A single column within a table listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,

    /// Warehouse data type, verbatim
    #[serde(rename = "type")]
    pub data_type: String,

    /// Whether the column admits NULLs
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

/// Provenance and display properties attached to a table listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableProperties {
    /// Source dataset id, set when the listing spans multiple datasets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetId>,
}

/// Compact table record built from a warehouse listing.
///
/// Names are unique within a dataset, not globally: two datasets may each
/// carry a table with the same name, distinguished only by the dataset
/// property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactTable {
    /// Table name (unique within its dataset)
    pub name: String,

    /// Column listing
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,

    /// Provenance properties
    #[serde(default)]
    pub properties: TableProperties,

    /// Primary-key column names, when the warehouse exposes them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<Vec<String>>,
}

impl CompactTable {
    /// Build a table record with columns and no provenance tag.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        Self {
            name: name.into(),
            columns,
            properties: TableProperties::default(),
            primary_key: None,
        }
    }

    /// Tag this table with the dataset it was listed from.
    pub fn tagged(mut self, dataset: DatasetId) -> Self {
        self.properties.dataset = Some(dataset);
        self
    }
}

/// Canonical terminal submission shape: one entry per selected table, with
/// provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSelection {
    /// Dataset the table was selected from
    pub dataset_id: DatasetId,

    /// Selected table name
    pub table_name: String,
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;

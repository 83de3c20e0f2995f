//! Dataset metadata produced by discovery.

use crate::dataset_id::DatasetId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a single discovered dataset.
///
/// Produced by discovery and immutable thereafter. Only `id` is guaranteed:
/// a dataset whose extended-metadata fetch failed is still reported, with
/// every optional field empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    /// Unique dataset identifier within the project
    pub id: DatasetId,

    /// Human-friendly display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Geographic location, e.g. "US" or "EU"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,

    /// Last modification timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<DateTime<Utc>>,
}

impl DatasetInfo {
    /// Build a dataset record carrying only its id.
    ///
    /// Used when the per-dataset metadata fetch failed but the dataset must
    /// still appear in the discovery result.
    pub fn id_only(id: DatasetId) -> Self {
        Self {
            id,
            friendly_name: None,
            description: None,
            location: None,
            creation_time: None,
            last_modified_time: None,
        }
    }
}

//! Configuration types and parsing for datadock.yml

use crate::dataset_id::DatasetId;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Warehouse kind for a configured target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// Google BigQuery (dataset discovery + multi-dataset aggregation)
    #[default]
    BigQuery,
    /// Local DuckDB database
    DuckDb,
    /// Postgres (not yet implemented)
    Postgres,
}

impl DataSourceKind {
    /// Whether this kind supports the dataset discovery/selection flow.
    ///
    /// Non-BigQuery kinds bypass discovery entirely: a single ungrouped
    /// table listing is used instead.
    pub fn supports_dataset_discovery(&self) -> bool {
        matches!(self, DataSourceKind::BigQuery)
    }

    /// Kind identifier for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceKind::BigQuery => "bigquery",
            DataSourceKind::DuckDb => "duckdb",
            DataSourceKind::Postgres => "postgres",
        }
    }
}

/// Connection descriptor handed to metadata providers.
///
/// The aggregator derives per-dataset variants of a base descriptor by
/// filling in `dataset`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionInfo {
    /// Cloud project id (BigQuery)
    pub project_id: Option<String>,

    /// Database path (DuckDB) or connection string (Postgres)
    pub database: Option<String>,

    /// Dataset scope for a single listing call
    pub dataset: Option<DatasetId>,
}

impl ConnectionInfo {
    /// Derive a copy of this descriptor scoped to one dataset.
    pub fn with_dataset(&self, dataset: DatasetId) -> Self {
        Self {
            dataset: Some(dataset),
            ..self.clone()
        }
    }
}

/// A named warehouse target from datadock.yml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarehouseTarget {
    /// Warehouse kind
    #[serde(rename = "type")]
    pub kind: DataSourceKind,

    /// Cloud project id (required for bigquery targets)
    #[serde(default)]
    pub project_id: Option<String>,

    /// Path to a credentials file (service-account JSON, possibly
    /// base64-encoded). The file content is read per flow and never cached.
    #[serde(default)]
    pub credentials_file: Option<String>,

    /// Database path for local targets
    #[serde(default = "default_database")]
    pub database: String,

    /// Pre-selected dataset ids (skips interactive selection)
    #[serde(default)]
    pub datasets: Vec<DatasetId>,
}

impl WarehouseTarget {
    /// Base connection descriptor for this target (no dataset scope).
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            project_id: self.project_id.clone(),
            database: Some(self.database.clone()),
            dataset: None,
        }
    }
}

/// Main project configuration from datadock.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetupConfig {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Named warehouse targets
    pub targets: HashMap<String, WarehouseTarget>,

    /// Target used when none is given on the command line
    #[serde(default)]
    pub default_target: Option<String>,

    /// Timeout applied to every warehouse round-trip, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on concurrent per-dataset requests
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_database() -> String {
    ":memory:".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_requests() -> usize {
    8
}

const CONFIG_FILENAMES: [&str; 2] = ["datadock.yml", "datadock.yaml"];

impl SetupConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: SetupConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory (datadock.yml or .yaml)
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILENAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILENAMES[0]).display().to_string(),
        })
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> CoreResult<()> {
        if self.targets.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "at least one target must be defined".to_string(),
            });
        }

        for (name, target) in &self.targets {
            if target.kind == DataSourceKind::BigQuery && target.project_id.is_none() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("bigquery target '{}' requires project_id", name),
                });
            }
        }

        if let Some(default) = &self.default_target {
            if !self.targets.contains_key(default) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("default_target '{}' is not a defined target", default),
                });
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "request_timeout_secs must be greater than zero".to_string(),
            });
        }

        if self.max_concurrent_requests == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "max_concurrent_requests must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Resolve a target by name, or fall back to the configured default.
    pub fn resolve_target(&self, name: Option<&str>) -> CoreResult<(&str, &WarehouseTarget)> {
        let name = match name.or(self.default_target.as_deref()) {
            Some(n) => n,
            // A single configured target needs no explicit choice.
            None => match self.targets.keys().next() {
                Some(only) if self.targets.len() == 1 => only.as_str(),
                _ => {
                    return Err(CoreError::ConfigInvalid {
                        message: "no target given and no default_target configured".to_string(),
                    })
                }
            },
        };

        self.targets
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| CoreError::UnknownTarget {
                name: name.to_string(),
            })
    }

    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

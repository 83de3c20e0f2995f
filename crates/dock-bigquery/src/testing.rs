//! In-memory [`DatasetApi`] double shared by this crate's tests.

use crate::api::{
    DatasetApi, DatasetListEntry, DatasetMetadata, DatasetReference, TableListEntry,
    TableMetadata, TableReference,
};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

pub(crate) struct MockApi {
    pub project_id: String,
    pub datasets: Vec<DatasetMetadata>,
    pub tables: HashMap<String, Vec<TableMetadata>>,
    /// Fail `datasets.list` with this HTTP status
    pub list_status: Option<u16>,
    /// Datasets whose `datasets.get` fails (metadata fetch / access check)
    pub broken_datasets: HashSet<String>,
    /// Datasets whose `tables.list` fails
    pub broken_tables: HashSet<String>,
}

impl MockApi {
    pub fn new(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            datasets: Vec::new(),
            tables: HashMap::new(),
            list_status: None,
            broken_datasets: HashSet::new(),
            broken_tables: HashSet::new(),
        }
    }

    pub fn with_dataset(mut self, dataset_id: &str, friendly_name: Option<&str>) -> Self {
        self.datasets.push(DatasetMetadata {
            dataset_reference: DatasetReference {
                project_id: self.project_id.clone(),
                dataset_id: dataset_id.to_string(),
            },
            friendly_name: friendly_name.map(String::from),
            description: None,
            location: Some("US".to_string()),
            creation_time: Some("1700000000000".to_string()),
            last_modified_time: None,
        });
        self
    }

    pub fn with_table(mut self, dataset_id: &str, table_id: &str) -> Self {
        let table = TableMetadata {
            table_reference: TableReference {
                project_id: self.project_id.clone(),
                dataset_id: dataset_id.to_string(),
                table_id: table_id.to_string(),
            },
            schema: None,
            table_constraints: None,
        };
        self.tables
            .entry(dataset_id.to_string())
            .or_default()
            .push(table);
        self
    }

    pub fn with_list_status(mut self, status: u16) -> Self {
        self.list_status = Some(status);
        self
    }

    pub fn with_broken_dataset(mut self, dataset_id: &str) -> Self {
        self.broken_datasets.insert(dataset_id.to_string());
        self
    }

    pub fn with_broken_tables(mut self, dataset_id: &str) -> Self {
        self.broken_tables.insert(dataset_id.to_string());
        self
    }

    fn status(code: u16) -> ApiError {
        ApiError::Status {
            code,
            message: format!("mock status {}", code),
        }
    }
}

#[async_trait]
impl DatasetApi for MockApi {
    async fn list_datasets(&self, project_id: &str) -> ApiResult<Vec<DatasetListEntry>> {
        if let Some(code) = self.list_status {
            return Err(Self::status(code));
        }
        if project_id != self.project_id {
            return Err(Self::status(404));
        }
        Ok(self
            .datasets
            .iter()
            .map(|d| DatasetListEntry {
                dataset_reference: d.dataset_reference.clone(),
                friendly_name: d.friendly_name.clone(),
                location: d.location.clone(),
            })
            .collect())
    }

    async fn get_dataset(&self, project_id: &str, dataset_id: &str) -> ApiResult<DatasetMetadata> {
        if project_id != self.project_id {
            return Err(Self::status(404));
        }
        if self.broken_datasets.contains(dataset_id) {
            return Err(Self::status(403));
        }
        self.datasets
            .iter()
            .find(|d| d.dataset_reference.dataset_id == dataset_id)
            .cloned()
            .ok_or_else(|| Self::status(404))
    }

    async fn list_tables(
        &self,
        project_id: &str,
        dataset_id: &str,
    ) -> ApiResult<Vec<TableListEntry>> {
        if project_id != self.project_id {
            return Err(Self::status(404));
        }
        if self.broken_tables.contains(dataset_id) {
            return Err(Self::status(500));
        }
        Ok(self
            .tables
            .get(dataset_id)
            .map(|tables| {
                tables
                    .iter()
                    .map(|t| TableListEntry {
                        table_reference: t.table_reference.clone(),
                        table_type: Some("TABLE".to_string()),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_table(
        &self,
        project_id: &str,
        dataset_id: &str,
        table_id: &str,
    ) -> ApiResult<TableMetadata> {
        if project_id != self.project_id {
            return Err(Self::status(404));
        }
        self.tables
            .get(dataset_id)
            .and_then(|tables| {
                tables
                    .iter()
                    .find(|t| t.table_reference.table_id == table_id)
            })
            .cloned()
            .ok_or_else(|| Self::status(404))
    }
}

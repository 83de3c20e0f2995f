//! BigQuery v2 REST client

use crate::api::{
    DatasetApi, DatasetListEntry, DatasetMetadata, TableListEntry, TableMetadata,
};
use crate::error::{ApiError, ApiResult};
use crate::token::TokenProvider;
use async_trait::async_trait;
use dock_core::{ServiceAccountCredentials, SetupConfig};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Public BigQuery v2 endpoint.
pub const BIGQUERY_V2_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

const PAGE_SIZE: &str = "1000";

/// Client construction knobs.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API base URL (overridable for tests and private endpoints)
    pub base_url: String,

    /// Timeout applied to every request
    pub request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: BIGQUERY_V2_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientOptions {
    /// Derive options from project configuration.
    pub fn from_config(config: &SetupConfig) -> Self {
        Self {
            request_timeout: config.request_timeout(),
            ..Self::default()
        }
    }
}

/// `datasets.list` response page.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetListResponse {
    #[serde(default)]
    datasets: Option<Vec<DatasetListEntry>>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// `tables.list` response page.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableListResponse {
    #[serde(default)]
    tables: Option<Vec<TableListEntry>>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Error envelope returned by Google APIs.
#[derive(Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorBody,
}

#[derive(Deserialize)]
struct GoogleErrorBody {
    message: String,
}

/// HTTP implementation of [`DatasetApi`].
///
/// Scoped to one credential record; a new client is built per discovery
/// flow so credentials never outlive the flow instance.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    credentials: ServiceAccountCredentials,
}

impl RestClient {
    pub fn new(
        credentials: ServiceAccountCredentials,
        token_provider: Arc<dyn TokenProvider>,
        options: &ClientOptions,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            token_provider,
            credentials,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let token = self.token_provider.bearer_token(&self.credentials).await?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<GoogleErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            };
            return Err(ApiError::Status {
                code: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl DatasetApi for RestClient {
    async fn list_datasets(&self, project_id: &str) -> ApiResult<Vec<DatasetListEntry>> {
        let url = format!("{}/projects/{}/datasets", self.base_url, project_id);
        let mut out = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("maxResults", PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let page: DatasetListResponse = self.get_json(&url, &query).await?;
            out.extend(page.datasets.unwrap_or_default());

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        log::debug!("listed {} datasets in project {}", out.len(), project_id);
        Ok(out)
    }

    async fn get_dataset(&self, project_id: &str, dataset_id: &str) -> ApiResult<DatasetMetadata> {
        let url = format!(
            "{}/projects/{}/datasets/{}",
            self.base_url, project_id, dataset_id
        );
        self.get_json(&url, &[]).await
    }

    async fn list_tables(
        &self,
        project_id: &str,
        dataset_id: &str,
    ) -> ApiResult<Vec<TableListEntry>> {
        let url = format!(
            "{}/projects/{}/datasets/{}/tables",
            self.base_url, project_id, dataset_id
        );
        let mut out = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("maxResults", PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let page: TableListResponse = self.get_json(&url, &query).await?;
            out.extend(page.tables.unwrap_or_default());

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(out)
    }

    async fn get_table(
        &self,
        project_id: &str,
        dataset_id: &str,
        table_id: &str,
    ) -> ApiResult<TableMetadata> {
        let url = format!(
            "{}/projects/{}/datasets/{}/tables/{}",
            self.base_url, project_id, dataset_id, table_id
        );
        self.get_json(&url, &[]).await
    }
}

//! dock-bigquery - BigQuery client for Datadock
//!
//! This crate implements dataset discovery, per-dataset access validation,
//! and the BigQuery-backed metadata provider over the v2 REST API. The
//! `DatasetApi` trait is the testing seam; `RestClient` is the HTTP
//! implementation.

pub mod access;
pub mod api;
pub mod discovery;
pub mod error;
pub mod provider;
pub mod rest;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use access::AccessValidator;
pub use api::{DatasetApi, DatasetListEntry, DatasetMetadata, TableListEntry, TableMetadata};
pub use discovery::{discover, DiscoveryClient};
pub use error::{ApiError, ApiResult};
pub use provider::BigQueryProvider;
pub use rest::{ClientOptions, RestClient, BIGQUERY_V2_BASE_URL};
pub use token::{StaticTokenProvider, TokenProvider};

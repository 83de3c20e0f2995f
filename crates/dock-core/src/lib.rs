//! dock-core - Core library for Datadock
//!
//! This crate provides the shared data model for the warehouse onboarding
//! flow: credential decoding, dataset and table metadata types, discovery
//! outcomes, access partitions, and datadock.yml configuration parsing.

pub mod config;
pub mod credentials;
pub mod dataset;
pub mod dataset_id;
pub mod discovery;
pub mod error;
pub mod partition;
pub mod table;

pub use config::{ConnectionInfo, DataSourceKind, SetupConfig, WarehouseTarget};
pub use credentials::ServiceAccountCredentials;
pub use dataset::DatasetInfo;
pub use dataset_id::DatasetId;
pub use discovery::{DiscoveryError, DiscoveryErrorCode, DiscoveryResult};
pub use error::{CoreError, CoreResult};
pub use partition::AccessPartition;
pub use table::{ColumnInfo, CompactTable, TableProperties, TableSelection};

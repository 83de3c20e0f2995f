//! dock-warehouse - Warehouse metadata layer for Datadock
//!
//! This crate provides the `MetadataProvider` trait, the DuckDB
//! implementation (and a Postgres stub for future implementation), and the
//! multi-dataset table aggregator.

pub mod aggregate;
pub mod duckdb;
pub mod error;
pub mod postgres;
pub mod traits;

pub use aggregate::{list_tables_across_datasets, AggregateOptions};
pub use duckdb::DuckDbProvider;
pub use postgres::PostgresProvider;
pub use error::{ProviderError, ProviderResult};
pub use traits::{ConstraintType, MetadataProvider, TableConstraint};

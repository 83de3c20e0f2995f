//! Metadata provider trait definition

use crate::error::ProviderResult;
use async_trait::async_trait;
use dock_core::{CompactTable, ConnectionInfo, DataSourceKind};
use serde::{Deserialize, Serialize};

/// Constraint kinds surfaced by providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintType {
    PrimaryKey,
    Unique,
}

/// A table-level constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConstraint {
    /// Table the constraint belongs to
    pub table: String,

    /// Constraint kind
    pub constraint_type: ConstraintType,

    /// Columns covered by the constraint, in definition order
    pub columns: Vec<String>,
}

/// Warehouse metadata abstraction.
///
/// Implementations must be Send + Sync for async operation. The connection
/// descriptor optionally carries a dataset scope; when present, listings are
/// restricted to that dataset.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// List tables with their columns, optionally scoped to one dataset
    async fn list_tables(&self, conn: &ConnectionInfo) -> ProviderResult<Vec<CompactTable>>;

    /// List table constraints, optionally scoped to one dataset
    async fn get_constraints(&self, conn: &ConnectionInfo) -> ProviderResult<Vec<TableConstraint>>;

    /// Warehouse engine version string
    async fn get_version(&self) -> ProviderResult<String>;

    /// Warehouse kind identifier
    fn kind(&self) -> DataSourceKind;
}

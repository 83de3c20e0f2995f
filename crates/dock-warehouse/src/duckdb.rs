//! DuckDB metadata provider implementation
//!
//! DuckDB schemas play the role datasets play on BigQuery. When the
//! connection descriptor carries no dataset scope, listings cover the
//! default "main" schema.

use crate::error::{ProviderError, ProviderResult};
use crate::traits::{ConstraintType, MetadataProvider, TableConstraint};
use async_trait::async_trait;
use dock_core::{ColumnInfo, CompactTable, ConnectionInfo, DataSourceKind};
use duckdb::{params, Connection};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

const DEFAULT_SCHEMA: &str = "main";

/// DuckDB-backed metadata provider
pub struct DuckDbProvider {
    conn: Mutex<Connection>,
}

impl DuckDbProvider {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> ProviderResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> ProviderResult<Self> {
        let conn =
            Connection::open(path).map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> ProviderResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Execute batch SQL (seeding and test setup)
    pub fn execute_batch(&self, sql: &str) -> ProviderResult<()> {
        let conn = self.lock_conn()?;
        conn.execute_batch(sql)
            .map_err(|e| ProviderError::QueryError(e.to_string()))
    }

    fn lock_conn(&self) -> ProviderResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ProviderError::MutexPoisoned(e.to_string()))
    }

    fn list_tables_sync(&self, schema: &str) -> ProviderResult<Vec<CompactTable>> {
        let conn = self.lock_conn()?;

        // The schema name comes from user-supplied dataset ids, so it is
        // bound, never interpolated.
        let sql = "SELECT table_name, column_name, data_type, is_nullable \
                   FROM information_schema.columns \
                   WHERE table_schema = ? \
                   ORDER BY table_name, ordinal_position";
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![schema], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        // BTreeMap keeps the listing in stable name order.
        let mut by_table: BTreeMap<String, Vec<ColumnInfo>> = BTreeMap::new();
        for row in rows {
            let (table, column, data_type, is_nullable) = row?;
            by_table.entry(table).or_default().push(ColumnInfo {
                name: column,
                data_type,
                nullable: is_nullable.eq_ignore_ascii_case("yes"),
            });
        }

        let pk_columns = self.primary_key_columns(&conn, schema)?;

        Ok(by_table
            .into_iter()
            .map(|(name, columns)| {
                let primary_key = pk_columns.get(&name).cloned();
                CompactTable {
                    primary_key,
                    ..CompactTable::new(name, columns)
                }
            })
            .collect())
    }

    fn primary_key_columns(
        &self,
        conn: &Connection,
        schema: &str,
    ) -> ProviderResult<BTreeMap<String, Vec<String>>> {
        let sql = "SELECT table_name, unnest(constraint_column_names) \
                   FROM duckdb_constraints() \
                   WHERE constraint_type = 'PRIMARY KEY' AND schema_name = ?";
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![schema], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut by_table: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in rows {
            let (table, column) = row?;
            by_table.entry(table).or_default().push(column);
        }
        Ok(by_table)
    }

    fn get_constraints_sync(&self, schema: &str) -> ProviderResult<Vec<TableConstraint>> {
        let conn = self.lock_conn()?;

        let sql = "SELECT table_name, constraint_type, unnest(constraint_column_names) \
                   FROM duckdb_constraints() \
                   WHERE constraint_type IN ('PRIMARY KEY', 'UNIQUE') AND schema_name = ?";
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![schema], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        // One constraint per (table, kind); columns accumulate in order.
        let mut grouped: BTreeMap<(String, ConstraintType), Vec<String>> = BTreeMap::new();
        for row in rows {
            let (table, kind, column) = row?;
            let constraint_type = if kind == "PRIMARY KEY" {
                ConstraintType::PrimaryKey
            } else {
                ConstraintType::Unique
            };
            grouped
                .entry((table, constraint_type))
                .or_default()
                .push(column);
        }

        Ok(grouped
            .into_iter()
            .map(|((table, constraint_type), columns)| TableConstraint {
                table,
                constraint_type,
                columns,
            })
            .collect())
    }

    fn get_version_sync(&self) -> ProviderResult<String> {
        let conn = self.lock_conn()?;
        let version: String = conn.query_row("SELECT version()", [], |row| row.get(0))?;
        Ok(version)
    }
}

#[async_trait]
impl MetadataProvider for DuckDbProvider {
    async fn list_tables(&self, conn: &ConnectionInfo) -> ProviderResult<Vec<CompactTable>> {
        let schema = conn.dataset.as_deref().unwrap_or(DEFAULT_SCHEMA);
        self.list_tables_sync(schema)
    }

    async fn get_constraints(&self, conn: &ConnectionInfo) -> ProviderResult<Vec<TableConstraint>> {
        let schema = conn.dataset.as_deref().unwrap_or(DEFAULT_SCHEMA);
        self.get_constraints_sync(schema)
    }

    async fn get_version(&self) -> ProviderResult<String> {
        self.get_version_sync()
    }

    fn kind(&self) -> DataSourceKind {
        DataSourceKind::DuckDb
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;

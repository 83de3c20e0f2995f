//! Error types for dock-warehouse

use thiserror::Error;

/// Metadata provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Connection error (W001)
    #[error("[W001] Warehouse connection failed: {0}")]
    ConnectionError(String),

    /// Metadata query error (W002)
    #[error("[W002] Metadata query failed: {0}")]
    QueryError(String),

    /// Dataset missing or unreadable (W003)
    #[error("[W003] Dataset '{dataset}' is unavailable: {message}")]
    DatasetUnavailable { dataset: String, message: String },

    /// Not implemented (W004)
    #[error("[W004] Feature not implemented for {backend}: {feature}")]
    NotImplemented { backend: String, feature: String },

    /// Request timed out (W005)
    #[error("[W005] Metadata request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Mutex poisoned (W006)
    #[error("[W006] Provider mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Remote API error (W007)
    #[error("[W007] Warehouse API error: {0}")]
    Api(String),
}

/// Result type alias for ProviderError
pub type ProviderResult<T> = Result<T, ProviderError>;

impl From<duckdb::Error> for ProviderError {
    fn from(err: duckdb::Error) -> Self {
        ProviderError::QueryError(err.to_string())
    }
}

//! Error types for dock-bigquery

use thiserror::Error;

/// BigQuery API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure, including request timeouts (B001)
    #[error("[B001] HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the API (B002)
    #[error("[B002] BigQuery API returned status {code}: {message}")]
    Status { code: u16, message: String },

    /// Bearer token could not be produced (B003)
    #[error("[B003] Token provider error: {0}")]
    Token(String),
}

/// Result type alias for ApiError
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status code carried by this error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { code, .. } => Some(*code),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Token(_) => None,
        }
    }
}

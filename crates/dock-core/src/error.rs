//! Error types for dock-core

use thiserror::Error;

/// Core error type for Datadock
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Credentials blob is neither base64-encoded JSON nor plain JSON
    #[error("[C001] Invalid credentials format: {message}")]
    InvalidCredentialsFormat { message: String },

    /// C002: Configuration file not found
    #[error("[C002] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C003: Failed to parse configuration file
    #[error("[C003] Failed to parse config: {0}")]
    ConfigParseError(#[from] serde_yaml::Error),

    /// C004: Invalid configuration value
    #[error("[C004] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C005: Target not defined in the configuration
    #[error("[C005] Unknown target '{name}': not defined in datadock.yml")]
    UnknownTarget { name: String },

    /// C006: IO error with file path context
    #[error("[C006] IO error on {path}: {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

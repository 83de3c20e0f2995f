//! Discovery outcome types
//!
//! A discovery attempt either yields an ordered list of datasets or a
//! structured error the UI can act on. The error carries a stable code and a
//! `requiresManualInput` flag telling the caller whether falling back to
//! free-text dataset entry makes sense (permission problems and unknown
//! failures) or whether the input itself must be fixed first (bad
//! credentials, unknown project).

use crate::dataset::DatasetInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes for dataset discovery failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscoveryErrorCode {
    /// Credentials lack dataset enumeration permission (recoverable via
    /// manual dataset entry)
    InsufficientPermissions,
    /// Credentials were rejected by the warehouse
    AuthenticationFailed,
    /// Project does not exist or is not visible
    ProjectNotFound,
    /// Credentials blob could not be decoded
    InvalidCredentials,
    /// Catch-all for unexpected failures (recoverable via manual entry)
    DiscoveryFailed,
}

impl DiscoveryErrorCode {
    /// Whether the caller should offer free-text dataset entry instead of a
    /// plain retry.
    pub fn requires_manual_input(&self) -> bool {
        matches!(
            self,
            DiscoveryErrorCode::InsufficientPermissions | DiscoveryErrorCode::DiscoveryFailed
        )
    }
}

impl fmt::Display for DiscoveryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiscoveryErrorCode::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            DiscoveryErrorCode::AuthenticationFailed => "AUTHENTICATION_FAILED",
            DiscoveryErrorCode::ProjectNotFound => "PROJECT_NOT_FOUND",
            DiscoveryErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            DiscoveryErrorCode::DiscoveryFailed => "DISCOVERY_FAILED",
        };
        f.write_str(s)
    }
}

/// Structured discovery failure handed to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryError {
    /// Stable error code
    pub code: DiscoveryErrorCode,

    /// Human-readable message
    pub message: String,

    /// Whether manual dataset entry is the sensible fallback
    pub requires_manual_input: bool,
}

impl DiscoveryError {
    /// Build an error; the manual-input flag is derived from the code.
    pub fn new(code: DiscoveryErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            requires_manual_input: code.requires_manual_input(),
        }
    }
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Outcome of a discovery attempt. Exactly one branch is populated.
///
/// Serialized as `{"success":true,"datasets":[...]}` or
/// `{"success":false,"error":{...}}` so transport layers can pass it
/// through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryResult {
    /// Discovery succeeded; datasets are in warehouse listing order
    Success(Vec<DatasetInfo>),
    /// Discovery failed
    Failure(DiscoveryError),
}

impl DiscoveryResult {
    /// Build the success branch.
    pub fn success(datasets: Vec<DatasetInfo>) -> Self {
        DiscoveryResult::Success(datasets)
    }

    /// Build the failure branch.
    pub fn failure(error: DiscoveryError) -> Self {
        DiscoveryResult::Failure(error)
    }

    /// Whether this is the success branch.
    pub fn is_success(&self) -> bool {
        matches!(self, DiscoveryResult::Success(_))
    }

    /// Datasets on success, `None` on failure.
    pub fn datasets(&self) -> Option<&[DatasetInfo]> {
        match self {
            DiscoveryResult::Success(datasets) => Some(datasets),
            DiscoveryResult::Failure(_) => None,
        }
    }

    /// Error on failure, `None` on success.
    pub fn error(&self) -> Option<&DiscoveryError> {
        match self {
            DiscoveryResult::Success(_) => None,
            DiscoveryResult::Failure(e) => Some(e),
        }
    }
}

/// Wire shape: a `success` flag plus exactly one of `datasets`/`error`.
#[derive(Serialize, Deserialize)]
struct DiscoveryResultWire {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datasets: Option<Vec<DatasetInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<DiscoveryError>,
}

impl Serialize for DiscoveryResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let wire = match self {
            DiscoveryResult::Success(datasets) => DiscoveryResultWire {
                success: true,
                datasets: Some(datasets.clone()),
                error: None,
            },
            DiscoveryResult::Failure(error) => DiscoveryResultWire {
                success: false,
                datasets: None,
                error: Some(error.clone()),
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DiscoveryResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wire = DiscoveryResultWire::deserialize(deserializer)?;
        match (wire.success, wire.datasets, wire.error) {
            (true, datasets, None) => Ok(DiscoveryResult::Success(datasets.unwrap_or_default())),
            (false, None, Some(error)) => Ok(DiscoveryResult::Failure(error)),
            _ => Err(serde::de::Error::custom(
                "discovery result must carry datasets on success or error on failure, never both",
            )),
        }
    }
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;

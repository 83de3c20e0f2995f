//! Bearer-token acquisition seam
//!
//! Exchanging a service-account key for an OAuth access token is the job of
//! an external collaborator (the deployment's secret/token service). The
//! REST client only needs something that can produce a bearer token for a
//! given credential record.

use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use dock_core::ServiceAccountCredentials;

/// Produces bearer tokens for API requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self, credentials: &ServiceAccountCredentials) -> ApiResult<String>;
}

/// Token provider backed by a pre-issued access token.
///
/// Suitable for CLI use (`DATADOCK_ACCESS_TOKEN`) and tests; production
/// deployments plug in their token service instead.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Read the token from an environment variable.
    pub fn from_env(var: &str) -> ApiResult<Self> {
        match std::env::var(var) {
            Ok(token) if !token.is_empty() => Ok(Self::new(token)),
            _ => Err(ApiError::Token(format!(
                "environment variable {} is not set",
                var
            ))),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self, _credentials: &ServiceAccountCredentials) -> ApiResult<String> {
        Ok(self.token.clone())
    }
}

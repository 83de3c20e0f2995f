//! Service-account credential decoding
//!
//! Credential blobs arrive either base64-encoded (the common case when they
//! were copied out of an environment variable) or as a plain JSON string.
//! Decoding tries both, in that order, and parses the result into a typed
//! record once at the boundary. Credentials are transient values: they are
//! never persisted by this crate and never logged beyond lengths and flags.

use crate::error::{CoreError, CoreResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated service-account credential record.
///
/// Unknown fields (auth URIs, certificate URLs, universe domain) are
/// tolerated and dropped; only the fields the warehouse clients need are
/// retained.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceAccountCredentials {
    /// Credential kind, e.g. "service_account"
    #[serde(rename = "type")]
    pub credential_type: String,

    /// Project the key was issued for
    pub project_id: String,

    /// Key identifier
    #[serde(default)]
    pub private_key_id: Option<String>,

    /// PEM-encoded private key
    pub private_key: String,

    /// Service-account email
    pub client_email: String,

    /// OAuth client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// Token exchange endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

// Manual Debug so the private key never lands in log output.
impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("credential_type", &self.credential_type)
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Decode a raw credentials blob into a validated record.
///
/// Order matters: base64-then-JSON first, then direct JSON for blobs that
/// were never base64-encoded. Both failing is a non-recoverable input error
/// (`[C001]`), never a panic.
pub fn decode(raw: &str) -> CoreResult<ServiceAccountCredentials> {
    let trimmed = raw.trim();

    if let Ok(bytes) = BASE64.decode(trimmed) {
        if let Ok(text) = String::from_utf8(bytes) {
            if let Ok(creds) = parse_json(&text) {
                log::debug!(
                    "decoded credentials blob ({} bytes, base64=true)",
                    trimmed.len()
                );
                return Ok(creds);
            }
        }
    }

    match parse_json(trimmed) {
        Ok(creds) => {
            log::debug!(
                "decoded credentials blob ({} bytes, base64=false)",
                trimmed.len()
            );
            Ok(creds)
        }
        Err(e) => {
            log::debug!(
                "failed to decode credentials blob ({} bytes): {}",
                trimmed.len(),
                e
            );
            Err(e)
        }
    }
}

fn parse_json(text: &str) -> CoreResult<ServiceAccountCredentials> {
    // The serde error is category-only here: it names the missing/invalid
    // field but never echoes field values back.
    serde_json::from_str(text).map_err(|e| CoreError::InvalidCredentialsFormat {
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;

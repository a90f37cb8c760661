//! Errors from the upstream API.

use serde_json::Value;

/// Appended to the message of 401/403 failures
pub const AUTH_REMEDIATION: &str = "Check that UPSTREAM_API_KEY holds a valid key. \
If you do not have one, register for an account at https://suarify.my/register";

/// A failed upstream call
///
/// `status` is `None` when no response was received at all (connection
/// refused, DNS failure, timeout).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct UpstreamError {
    pub status: Option<u16>,
    pub payload: Option<Value>,
    pub message: String,
}

impl UpstreamError {
    /// Non-2xx response
    pub fn http(status: u16, payload: Option<Value>) -> Self {
        Self {
            status: Some(status),
            payload,
            message: format!("Request failed with status code {}", status),
        }
    }

    /// No response received
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            payload: None,
            message: message.into(),
        }
    }

    /// Response head received but the body could not be read
    pub fn body(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            payload: None,
            message: format!("Failed to read response body: {}", message.into()),
        }
    }

    /// Status code as shown to users, or `Network`
    pub fn status_label(&self) -> String {
        self.status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "Network".to_string())
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }

    pub(crate) fn with_auth_hint(mut self) -> Self {
        self.message = format!("{}. {}", self.message, AUTH_REMEDIATION);
        self
    }
}

/// Errors constructing the upstream client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidApiKey,

    #[error("Failed to create HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

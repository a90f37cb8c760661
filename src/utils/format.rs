//! Result formatting: turns upstream outcomes into tool envelopes.
//!
//! Every function here is total. Whatever happened during a call, the caller
//! gets a well-formed [`ToolEnvelope`] back.

use serde_json::Value;

use crate::models::ToolEnvelope;
use crate::upstream::UpstreamError;

/// Failure while handling a tool call
#[derive(Debug, Clone, thiserror::Error)]
pub enum ToolError {
    /// The upstream HTTP call failed
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Anything else (bad handler input, serialization)
    #[error("{0}")]
    Unexpected(String),
}

/// Human-readable first line of a success envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summary {
    /// A fixed sentence
    Fixed(&'static str),

    /// "Retrieved N <noun>", counting the array under `key` (or the payload
    /// itself when it is an array)
    Count {
        noun: &'static str,
        key: Option<&'static str>,
    },
}

impl Summary {
    pub fn render(&self, payload: &Value) -> String {
        match self {
            Summary::Fixed(text) => (*text).to_string(),
            Summary::Count { noun, key } => match count_items(payload, *key) {
                Some(n) => format!("Retrieved {} {}", n, noun),
                None => format!("Retrieved {}", noun),
            },
        }
    }
}

fn count_items(payload: &Value, key: Option<&str>) -> Option<usize> {
    if let Some(items) = key.and_then(|k| payload.get(k)).and_then(Value::as_array) {
        return Some(items.len());
    }
    if let Some(items) = payload.as_array() {
        return Some(items.len());
    }
    payload.get("data").and_then(Value::as_array).map(Vec::len)
}

/// Success envelope: summary plus pretty JSON as text, raw payload as
/// structured content
pub fn format_success(summary: &str, payload: Value) -> ToolEnvelope {
    let pretty = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    ToolEnvelope::success(format!("{}\n\n{}", summary, pretty), payload)
}

/// Error envelope for any failure
pub fn format_error(err: &ToolError) -> ToolEnvelope {
    let text = match err {
        ToolError::Upstream(upstream) => {
            let mut text = format!(
                "API Error ({}): {}",
                upstream.status_label(),
                upstream.message
            );
            if let Some(ref payload) = upstream.payload {
                text.push_str(" - ");
                text.push_str(&payload.to_string());
            }
            text
        }
        ToolError::Unexpected(message) => format!("Unexpected Error: {}", message),
    };
    ToolEnvelope::error(text)
}

/// Format either outcome of a call
pub fn format_result(summary: Summary, outcome: Result<Value, ToolError>) -> ToolEnvelope {
    match outcome {
        Ok(payload) => {
            let line = summary.render(&payload);
            format_success(&line, payload)
        }
        Err(err) => format_error(&err),
    }
}

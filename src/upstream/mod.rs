//! Upstream REST API access.
//!
//! [`UpstreamClient`] performs one HTTP call per tool invocation against the
//! configured base URL. Every request carries the static `x-api-key` header.
//! Failed calls surface as [`UpstreamError`]; authentication failures (401 and
//! 403) have [`AUTH_REMEDIATION`] appended to their message by the client's
//! response interceptor before any caller sees them.

mod client;
mod error;

pub use client::{intercept, UpstreamClient};
pub use error::{ClientError, UpstreamError, AUTH_REMEDIATION};

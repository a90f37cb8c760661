//! HTTP client bound to the upstream API.

use reqwest::{header, Client, Response};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::{ClientError, UpstreamError};
use crate::config::Config;
use crate::models::{query_pairs, HttpMethod, UpstreamRequest};

/// Upstream API client
///
/// Holds the base URL and a `reqwest::Client` whose default headers carry the
/// API key. Immutable after construction, so clones can be shared freely
/// between concurrent tool calls.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Arc<Client>,
    base_url: Arc<str>,
}

impl UpstreamClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        if let Some(ref api_key) = config.api_key {
            let mut value =
                header::HeaderValue::from_str(api_key).map_err(|_| ClientError::InvalidApiKey)?;
            value.set_sensitive(true);
            headers.insert(header::HeaderName::from_static("x-api-key"), value);
        }

        let mut builder = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers(headers);

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: Arc::new(builder.build()?),
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Issue one request and return the parsed response body
    ///
    /// Failures pass through [`intercept`] exactly once before being returned.
    pub async fn send(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError> {
        let url = self.build_url(&request.path);
        debug!(method = %request.method, path = %request.path, "Upstream request");

        let mut builder = self.client.request(request.method.into(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let result = match builder.send().await {
            Ok(response) => read_response(response).await,
            Err(e) => Err(UpstreamError::network(e.to_string())),
        };

        result.map_err(|err| {
            let err = intercept(err);
            warn!(
                method = %request.method,
                path = %request.path,
                status = %err.status_label(),
                "Upstream request failed: {}",
                err.message
            );
            err
        })
    }

    /// GET with query parameters
    pub async fn get(&self, path: &str, query: &Map<String, Value>) -> Result<Value, UpstreamError> {
        self.send(&UpstreamRequest {
            method: HttpMethod::Get,
            path: path.to_string(),
            query: query_pairs(query),
            body: None,
        })
        .await
    }

    /// POST with a JSON body
    pub async fn post(&self, path: &str, body: Value) -> Result<Value, UpstreamError> {
        self.send(&UpstreamRequest {
            method: HttpMethod::Post,
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body),
        })
        .await
    }

    /// PATCH with a JSON body
    pub async fn patch(&self, path: &str, body: Value) -> Result<Value, UpstreamError> {
        self.send(&UpstreamRequest {
            method: HttpMethod::Patch,
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body),
        })
        .await
    }

    /// DELETE with optional query parameters
    pub async fn delete(
        &self,
        path: &str,
        query: Option<&Map<String, Value>>,
    ) -> Result<Value, UpstreamError> {
        self.send(&UpstreamRequest {
            method: HttpMethod::Delete,
            path: path.to_string(),
            query: query.map(query_pairs).unwrap_or_default(),
            body: None,
        })
        .await
    }
}

/// Response interceptor: adds the remediation hint to authentication failures
pub fn intercept(err: UpstreamError) -> UpstreamError {
    if err.is_auth_failure() {
        err.with_auth_hint()
    } else {
        err
    }
}

async fn read_response(response: Response) -> Result<Value, UpstreamError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| UpstreamError::body(status.as_u16(), e.to_string()))?;
    let payload = parse_body(&bytes);

    if status.is_success() {
        Ok(payload)
    } else {
        let payload = (!payload.is_null()).then_some(payload);
        Err(UpstreamError::http(status.as_u16(), payload))
    }
}

/// Empty body is `null`, JSON is parsed, anything else becomes a string
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

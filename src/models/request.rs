//! Upstream request descriptors derived from tool arguments.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Placeholder in a path template replaced by the `id` argument
const ID_PLACEHOLDER: &str = "{id}";

/// Name of the argument interpolated into path templates
pub const ID_PARAM: &str = "id";

/// HTTP methods used against the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Where a tool's arguments go in the upstream request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Every argument becomes a query parameter
    Query,
    /// The whole argument map is the JSON body
    Body,
    /// `id` goes into the path, the rest into the query
    PathIdQuery,
    /// `id` goes into the path, the rest into the JSON body
    PathIdBody,
    /// `id` goes into the path, nothing else is sent
    PathId,
}

impl Placement {
    /// Whether this placement consumes the `id` argument as a path segment
    pub fn uses_path_id(&self) -> bool {
        matches!(
            self,
            Placement::PathIdQuery | Placement::PathIdBody | Placement::PathId
        )
    }
}

/// A fully resolved request against the upstream API
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Errors building a request from tool arguments
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Missing '{0}' path parameter")]
    MissingPathParam(&'static str),

    #[error("Path parameter '{0}' must be a non-empty string or integer")]
    InvalidPathParam(&'static str),
}

impl UpstreamRequest {
    /// Build the request for a route from validated arguments
    pub fn from_route(
        method: HttpMethod,
        template: &str,
        placement: Placement,
        mut args: Map<String, Value>,
    ) -> Result<Self, RequestError> {
        let path = if placement.uses_path_id() {
            let id = args
                .remove(ID_PARAM)
                .ok_or(RequestError::MissingPathParam(ID_PARAM))?;
            let segment = path_segment(&id).ok_or(RequestError::InvalidPathParam(ID_PARAM))?;
            template.replace(ID_PLACEHOLDER, &urlencoding::encode(&segment))
        } else {
            template.to_string()
        };

        let (query, body) = match placement {
            Placement::Query | Placement::PathIdQuery => (query_pairs(&args), None),
            Placement::Body | Placement::PathIdBody => (Vec::new(), Some(Value::Object(args))),
            Placement::PathId => (Vec::new(), None),
        };

        Ok(Self {
            method,
            path,
            query,
            body,
        })
    }
}

fn path_segment(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

/// Flatten arguments into query pairs, skipping nulls
pub fn query_pairs(args: &Map<String, Value>) -> Vec<(String, String)> {
    args.iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), rendered))
        })
        .collect()
}

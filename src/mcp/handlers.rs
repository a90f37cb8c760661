//! Tool handlers that forward a call to one upstream endpoint.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::tools::ToolHandler;
use crate::models::{HttpMethod, Placement, ToolEnvelope, UpstreamRequest};
use crate::upstream::UpstreamClient;
use crate::utils::{format_result, Summary, ToolError};

/// Upstream endpoint a tool maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub method: HttpMethod,
    pub path: &'static str,
    pub placement: Placement,
}

impl Route {
    pub const fn new(method: HttpMethod, path: &'static str, placement: Placement) -> Self {
        Self {
            method,
            path,
            placement,
        }
    }

    /// Build the request for validated arguments
    pub fn request(&self, args: Map<String, Value>) -> Result<UpstreamRequest, ToolError> {
        UpstreamRequest::from_route(self.method, self.path, self.placement, args)
            .map_err(|e| ToolError::Unexpected(e.to_string()))
    }
}

/// Handler shared by every tool: one request, one envelope
#[derive(Debug)]
pub struct RouteHandler {
    pub route: Route,
    pub summary: Summary,
    pub client: UpstreamClient,
}

impl RouteHandler {
    pub fn new(route: Route, summary: Summary, client: UpstreamClient) -> Self {
        Self {
            route,
            summary,
            client,
        }
    }

    async fn call(&self, args: Map<String, Value>) -> Result<Value, ToolError> {
        let request = self.route.request(args)?;
        Ok(self.client.send(&request).await?)
    }
}

#[async_trait]
impl ToolHandler for RouteHandler {
    async fn execute(&self, args: Map<String, Value>) -> ToolEnvelope {
        format_result(self.summary, self.call(args).await)
    }
}

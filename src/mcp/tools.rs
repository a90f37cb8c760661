//! Tool registry for MCP tools.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::catalogue::{self, ToolDefinition};
use super::handlers::RouteHandler;
use super::schema::{ToolSchema, ValidationError};
use crate::models::ToolEnvelope;
use crate::upstream::UpstreamClient;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "suarify_list_leads")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Declared parameters
    pub schema: ToolSchema,

    /// JSON Schema for input parameters
    pub input_schema: Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

impl Tool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ToolSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        let input_schema = schema.input_schema();
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            input_schema,
            handler,
        }
    }

    /// Validate raw arguments, then run the handler
    pub async fn call(&self, args: Value) -> Result<ToolEnvelope, ValidationError> {
        let args = self.schema.validate(args)?;
        Ok(self.handler.execute(args).await)
    }
}

/// Handler for executing a tool
///
/// Handlers are total: every failure is reported inside the returned
/// envelope, never as an `Err`.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with validated arguments
    async fn execute(&self, args: Map<String, Value>) -> ToolEnvelope;
}

/// Failures that happen before a handler runs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolCallError {
    #[error("Tool '{0}' not found")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {source}")]
    InvalidParams {
        tool: String,
        #[source]
        source: ValidationError,
    },
}

/// Registry for all MCP tools
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the full catalogue against an upstream client
    ///
    /// Canonical `suarify_` names come first. With `legacy` set, the
    /// unprefixed names follow as deprecated aliases sharing the same
    /// handlers.
    pub fn catalogue(client: &UpstreamClient, legacy: bool) -> Self {
        let mut registry = Self::new();
        let mut aliases = Vec::new();

        for def in catalogue::definitions() {
            let canonical = def.canonical_name();
            let ToolDefinition {
                name,
                description,
                route,
                summary,
                params,
            } = def;

            let schema = ToolSchema::new(params);
            let handler: Arc<dyn ToolHandler> =
                Arc::new(RouteHandler::new(route, summary, client.clone()));

            if legacy {
                aliases.push(Tool::new(
                    name,
                    format!("[Deprecated: use {}] {}", canonical, description),
                    schema.clone(),
                    handler.clone(),
                ));
            }
            registry.register(Tool::new(canonical, description, schema, handler));
        }

        for alias in aliases {
            registry.register(alias);
        }

        tracing::debug!(tools = registry.len(), legacy, "Tool catalogue built");
        registry
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Tool) {
        match self.index.get(&tool.name).copied() {
            Some(pos) => self.tools[pos] = tool,
            None => {
                self.index.insert(tool.name.clone(), self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get all tools, in registration order
    pub fn all(&self) -> &[Tool] {
        &self.tools
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.index.get(name).map(|&pos| &self.tools[pos])
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<ToolEnvelope, ToolCallError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolCallError::UnknownTool(name.to_string()))?;

        tracing::info!(tool = name, "Tool call");
        let envelope = tool
            .call(args)
            .await
            .map_err(|source| ToolCallError::InvalidParams {
                tool: name.to_string(),
                source,
            })?;

        if envelope.is_error {
            tracing::warn!(tool = name, "Tool call returned an error envelope");
        }
        Ok(envelope)
    }
}

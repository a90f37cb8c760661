//! MCP server: JSON-RPC 2.0 over stdio.
//!
//! Requests arrive one per line on stdin. Each one is handled on its own task
//! and its response is written as a single line to stdout through an
//! [`OutputGuard`], so nothing but JSON frames ever reaches the protocol
//! channel. Tool results are sent as pmcp [`CallToolResult`]s carrying the
//! envelope's `isError` flag and `structuredContent` unchanged.

use std::io;
use std::sync::Arc;

use pmcp::{
    negotiate_protocol_version, CallToolResult, ErrorCode, ServerCapabilities, ToolInfo,
    LATEST_PROTOCOL_VERSION,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::mcp::tools::ToolRegistry;
use crate::utils::OutputGuard;

const SERVER_NAME: &str = "suarify-mcp";

/// A JSON-RPC request or notification
#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

/// Parameters of `tools/call`
#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// A JSON-RPC error object
#[derive(Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: ErrorCode,
    pub message: String,
}

impl RpcError {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_value(&self) -> Value {
        json!({ "code": self.code.as_i32(), "message": self.message })
    }
}

fn success(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn failure(id: Value, error: &RpcError) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": error.to_value() })
}

/// The MCP server for Suarify
///
/// Exposes the upstream voice-calling and lead-management API as MCP tools.
#[derive(Debug)]
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    /// Create a new MCP server with the given tool registry
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Number of tools registered with the server
    pub fn tool_count(&self) -> usize {
        self.registry.len()
    }

    /// Tool metadata as advertised by `tools/list`
    pub fn tool_infos(&self) -> Vec<ToolInfo> {
        self.registry
            .all()
            .iter()
            .map(|tool| {
                ToolInfo::new(
                    tool.name.clone(),
                    Some(tool.description.clone()),
                    tool.input_schema.clone(),
                )
            })
            .collect()
    }

    /// Handle one line read from the transport
    ///
    /// Returns the response frame, or `None` for notifications and blank
    /// lines.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        if line.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => {
                warn!("Unparseable frame: {}", e);
                let error = RpcError::new(ErrorCode::PARSE_ERROR, format!("Parse error: {}", e));
                Some(failure(Value::Null, &error))
            }
        }
    }

    /// Handle one decoded JSON-RPC message
    pub async fn handle_message(&self, message: Value) -> Option<Value> {
        let request: RpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                let error =
                    RpcError::new(ErrorCode::INVALID_REQUEST, format!("Invalid request: {}", e));
                return Some(failure(Value::Null, &error));
            }
        };

        let Some(id) = request.id else {
            debug!(method = %request.method, "Notification");
            return None;
        };

        Some(match self.dispatch(&request.method, request.params).await {
            Ok(result) => success(id, result),
            Err(error) => failure(id, &error),
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize(params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.tool_infos() })),
            "tools/call" => {
                let result = self.call_tool(params).await?;
                serde_json::to_value(result)
                    .map_err(|e| RpcError::new(ErrorCode::INTERNAL_ERROR, e.to_string()))
            }
            other => Err(RpcError::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }

    fn initialize(&self, params: Option<&Value>) -> Value {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or(LATEST_PROTOCOL_VERSION);
        let version = negotiate_protocol_version(requested);

        info!(protocol = %version, "Client initialized");
        json!({
            "protocolVersion": version,
            "capabilities": ServerCapabilities::tools_only(),
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    /// Run one `tools/call`
    ///
    /// Unknown tools and invalid arguments are protocol errors. Everything
    /// that happens after validation, upstream failures included, comes back
    /// as a result with `isError` set.
    pub async fn call_tool(&self, params: Option<Value>) -> Result<CallToolResult, RpcError> {
        let params: CallParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| RpcError::new(ErrorCode::INVALID_PARAMS, e.to_string()))?
            .ok_or_else(|| RpcError::new(ErrorCode::INVALID_PARAMS, "Missing params"))?;

        match self.registry.execute(&params.name, params.arguments).await {
            Ok(envelope) => Ok(envelope.into()),
            Err(err) => {
                warn!("{}", err);
                Err(RpcError::new(ErrorCode::INVALID_PARAMS, err.to_string()))
            }
        }
    }

    /// Serve over stdio until stdin closes
    pub async fn run(self) -> io::Result<()> {
        info!(tools = self.tool_count(), "MCP server listening on stdio");

        let server = Arc::new(self);
        let (tx, mut rx) = mpsc::unbounded_channel::<Value>();

        let writer = tokio::task::spawn_blocking(move || {
            let mut out = OutputGuard::stdio();
            while let Some(frame) = rx.blocking_recv() {
                out.write_frame(&frame)?;
            }
            Ok::<_, io::Error>(())
        });

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let server = Arc::clone(&server);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_line(&line).await {
                    if tx.send(response).is_err() {
                        warn!("Response dropped: output closed");
                    }
                }
            });
        }

        debug!("stdin closed");
        drop(tx);
        writer.await.map_err(io::Error::other)?
    }
}

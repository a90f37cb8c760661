//! MCP (Model Context Protocol) implementation.

pub mod catalogue;
mod handlers;
pub mod schema;
pub mod server;
mod tools;

pub use catalogue::{ToolDefinition, TOOL_PREFIX};
pub use handlers::{Route, RouteHandler};
pub use schema::{ParamKind, ParamSpec, ToolSchema, ValidationError};
pub use server::{McpServer, RpcError};
pub use tools::{Tool, ToolCallError, ToolHandler, ToolRegistry};

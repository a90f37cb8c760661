//! # Suarify MCP
//!
//! A Model Context Protocol (MCP) server that exposes the Suarify voice-calling
//! and lead-management REST API to AI agents as a catalogue of tools.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Request descriptors, tool envelopes and argument value types
//! - [`upstream`]: HTTP client bound to the Suarify API, with auth-failure hints
//! - [`mcp`]: Tool schemas, handlers, the tool registry and the stdio server
//! - [`utils`]: Result formatting and the protocol output guard
//! - [`config`]: Configuration management

pub mod config;
pub mod mcp;
pub mod models;
pub mod upstream;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use mcp::{McpServer, ToolRegistry};
pub use models::ToolEnvelope;
pub use upstream::{UpstreamClient, UpstreamError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

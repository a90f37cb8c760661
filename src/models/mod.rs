//! Data models for tool calls and upstream requests.

mod args;
mod envelope;
mod request;

pub use args::ConfigValue;
pub use envelope::{ContentBlock, ToolEnvelope};
pub use request::{query_pairs, HttpMethod, Placement, RequestError, UpstreamRequest, ID_PARAM};

//! Utility modules shared by the tool handlers and the binary.
//!
//! - [`format_result`], [`format_success`], [`format_error`]: Turn upstream
//!   outcomes into tool envelopes
//! - [`Summary`]: The human-readable first line of a success envelope
//! - [`OutputGuard`]: Keeps non-JSON bytes off the protocol channel
//! - [`init_logging`]: Tracing setup with every diagnostic on stderr

mod format;
mod output;

pub use format::{format_error, format_result, format_success, Summary, ToolError};
pub use output::{init_logging, Channel, OutputGuard};

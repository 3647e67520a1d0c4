//! MCP Client: JSON-RPC over HTTP for a remote orchestration server.
//!
//! This module handles:
//! - Endpoint resolution into an immutable value
//! - One-POST-per-call HTTP transport
//! - Request envelopes with per-instance correlation ids
//! - Tool discovery and invocation, including the nested tool payload decode
//! - Display classification of tool names

pub mod client;
pub mod endpoint;
pub mod envelope;
pub mod errors;
pub mod taxonomy;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod mock_server;

// Re-exports for convenience
pub use client::{ClientOptions, McpClient, DEFAULT_CALL_TIMEOUT};
pub use endpoint::{Endpoint, DEFAULT_ENDPOINT};
pub use envelope::EnvelopeBuilder;
pub use errors::McpError;
pub use taxonomy::{classify, group_by_family, ToolFamily};
pub use transport::HttpTransport;
pub use types::{CallToolResult, ToolDescriptor};

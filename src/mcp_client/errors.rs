//! MCP Client error types.

use thiserror::Error;

/// Errors that can occur during MCP client operations.
///
/// Transport-level variants (`ConnectionFailed`, `Timeout`, `Protocol`) never
/// carry a server-supplied message.
#[derive(Debug, Error)]
pub enum McpError {
    /// Socket or DNS failure while reaching the endpoint.
    #[error("connection failed to {endpoint}: {reason}")]
    ConnectionFailed {
        endpoint: String,
        reason: String,
    },

    /// No complete response within the caller-supplied bound.
    #[error("request to {endpoint} timed out after {timeout_ms}ms")]
    Timeout {
        endpoint: String,
        timeout_ms: u64,
    },

    /// The response could not be read as a complete, correlated reply.
    #[error("protocol error: {reason}")]
    Protocol {
        reason: String,
    },

    /// Server returned a JSON-RPC error envelope, or the envelope was malformed.
    #[error("server error [{code}]: {message}")]
    Rpc {
        code: i32,
        message: String,
        data: Option<serde_json::Value>,
    },

    /// The nested tool payload was missing or unparsable.
    #[error("malformed result from '{tool}': {reason}")]
    MalformedToolResult {
        tool: String,
        reason: String,
    },

    /// The tool ran and reported its own failure (`isError: true`).
    #[error("tool '{tool}' failed: {message}")]
    ToolFailed {
        tool: String,
        message: String,
    },

    /// Endpoint or client construction error.
    #[error("config error: {reason}")]
    ConfigError {
        reason: String,
    },
}

impl McpError {
    /// Whether this error originated below the envelope layer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            McpError::ConnectionFailed { .. } | McpError::Timeout { .. } | McpError::Protocol { .. }
        )
    }

    /// Text shown to the user.
    ///
    /// Malformed tool results read as "could not interpret response"; every
    /// other error is surfaced verbatim.
    pub fn user_message(&self) -> String {
        match self {
            McpError::MalformedToolResult { tool, reason } => {
                format!("could not interpret response from '{tool}': {reason}")
            }
            other => other.to_string(),
        }
    }
}

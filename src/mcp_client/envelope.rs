//! JSON-RPC envelope construction and unwrapping.
//!
//! The builder owns the correlation counter for one client instance. It
//! never retries; retry policy belongs to the caller.

use std::sync::atomic::{AtomicU64, Ordering};

use super::errors::McpError;
use super::types::{error_codes, JsonRpcRequest, JsonRpcResponse};

// ─── EnvelopeBuilder ─────────────────────────────────────────────────────────

/// Wraps method + params into request envelopes with strictly increasing ids.
#[derive(Debug)]
pub struct EnvelopeBuilder {
    next_id: AtomicU64,
}

impl EnvelopeBuilder {
    /// Create a builder whose first id is 1.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }

    /// Build a request envelope and return it with its correlation id.
    pub fn build(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> (JsonRpcRequest, u64) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        (JsonRpcRequest::new(id, method, params), id)
    }

    /// The id the next `build` call will assign.
    pub fn peek_next_id(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }

    /// Parse a response body and extract its `result`.
    ///
    /// - body not JSON → `Rpc` with `PARSE_ERROR`
    /// - id does not match `expected_id` → `Protocol`
    /// - error envelope → `Rpc` with the server's code and message
    /// - neither or both of `result`/`error` → `Rpc` with `INTERNAL_ERROR`
    pub fn unwrap(&self, body: &str, expected_id: u64) -> Result<serde_json::Value, McpError> {
        let response: JsonRpcResponse =
            serde_json::from_str(body).map_err(|e| McpError::Rpc {
                code: error_codes::PARSE_ERROR,
                message: format!("malformed response: {e}"),
                data: None,
            })?;

        // A null id is only legitimate on an error reply to an unparsable request.
        match response.id {
            Some(id) if id == expected_id => {}
            None if response.error.is_some() => {}
            other => {
                return Err(McpError::Protocol {
                    reason: format!(
                        "response id {} does not match request id {expected_id}",
                        other.map_or_else(|| "null".to_string(), |id| id.to_string())
                    ),
                })
            }
        }

        extract_result(response)
    }
}

impl Default for EnvelopeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Response Helpers ────────────────────────────────────────────────────────

/// Extract the result from a JSON-RPC response, converting errors to `McpError`.
pub fn extract_result(response: JsonRpcResponse) -> Result<serde_json::Value, McpError> {
    match (response.result, response.error) {
        (None, Some(err)) => Err(McpError::Rpc {
            code: err.code,
            message: err.message,
            data: err.data,
        }),
        (Some(result), None) => Ok(result),
        (Some(_), Some(_)) => Err(McpError::Rpc {
            code: error_codes::INTERNAL_ERROR,
            message: "response carries both result and error".into(),
            data: None,
        }),
        (None, None) => Err(McpError::Rpc {
            code: error_codes::INTERNAL_ERROR,
            message: "response missing both result and error".into(),
            data: None,
        }),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

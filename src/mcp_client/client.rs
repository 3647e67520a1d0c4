//! MCP Client: high-level interface for tool discovery and invocation.
//!
//! Composes the envelope builder and the HTTP transport, and hides the
//! two-layer result encoding: a `tools/call` envelope whose result holds
//! content blocks, the first text block of which is itself a JSON document.

use std::time::{Duration, Instant};

use super::endpoint::Endpoint;
use super::envelope::EnvelopeBuilder;
use super::errors::McpError;
use super::transport::HttpTransport;
use super::types::{methods, CallToolResult, ListToolsResult, ToolDescriptor};

// ─── Constants ───────────────────────────────────────────────────────────────

/// Default bound on one round trip. Container builds are slow.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

// ─── Options ─────────────────────────────────────────────────────────────────

/// Construction options for [`McpClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Bound on one complete round trip.
    pub call_timeout: Duration,
    /// Accept invalid or self-signed certificates.
    pub insecure_tls: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            insecure_tls: false,
        }
    }
}

// ─── McpClient ───────────────────────────────────────────────────────────────

/// Client for one remote MCP endpoint.
///
/// Calls are independent round trips; nothing is cached between them. The
/// only state shared across calls is the correlation counter.
pub struct McpClient {
    endpoint: Endpoint,
    transport: HttpTransport,
    envelopes: EnvelopeBuilder,
    call_timeout: Duration,
}

impl McpClient {
    /// Create a client bound to `endpoint`.
    pub fn new(endpoint: Endpoint, options: ClientOptions) -> Result<Self, McpError> {
        let transport = HttpTransport::new(options.insecure_tls)?;
        Ok(Self {
            endpoint,
            transport,
            envelopes: EnvelopeBuilder::new(),
            call_timeout: options.call_timeout,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Set the round-trip bound.
    pub fn set_call_timeout(&mut self, timeout: Duration) {
        self.call_timeout = timeout;
    }

    // ─── Envelope Layer ──────────────────────────────────────────────────

    /// Send one JSON-RPC request and return its `result`.
    pub async fn request(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, McpError> {
        let (envelope, id) = self.envelopes.build(method, params);
        let payload = serde_json::to_string(&envelope).map_err(|e| McpError::Protocol {
            reason: format!("failed to serialize request: {e}"),
        })?;

        let start = Instant::now();
        tracing::debug!(id, method, endpoint = %self.endpoint, "sending request");

        let body = self
            .transport
            .send(&self.endpoint, payload, self.call_timeout)
            .await
            .inspect_err(|e| tracing::warn!(id, method, error = %e, "transport failure"))?;

        let result = self.envelopes.unwrap(&body, id);
        tracing::info!(
            id,
            method,
            elapsed_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "request completed"
        );
        result
    }

    // ─── Discovery ───────────────────────────────────────────────────────

    /// Fetch the tool descriptors the server exposes.
    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError> {
        let result = self.request(methods::TOOLS_LIST, None).await?;
        let listing: ListToolsResult =
            serde_json::from_value(result).map_err(|e| McpError::Rpc {
                code: super::types::error_codes::INTERNAL_ERROR,
                message: format!("malformed tools/list result: {e}"),
                data: None,
            })?;
        Ok(listing.tools)
    }

    // ─── Tool Execution ──────────────────────────────────────────────────

    /// Call a tool and return its decoded content blocks.
    ///
    /// A result flagged `isError` becomes [`McpError::ToolFailed`].
    pub async fn call_tool(
        &self,
        tool_name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(tool = %tool_name, "invoking tool");

        let params = serde_json::json!({
            "name": tool_name,
            "arguments": arguments,
        });
        let result = self.request(methods::TOOLS_CALL, Some(params)).await?;

        let decoded: CallToolResult =
            serde_json::from_value(result).map_err(|e| McpError::MalformedToolResult {
                tool: tool_name.to_string(),
                reason: format!("result is not a content block list: {e}"),
            })?;

        if decoded.is_error {
            return Err(McpError::ToolFailed {
                tool: tool_name.to_string(),
                message: decoded.joined_text(),
            });
        }

        Ok(decoded)
    }

    /// Call a tool and return its first text block verbatim.
    ///
    /// Used for tools whose output is free-form text (resource listings).
    pub async fn invoke_text(
        &self,
        tool_name: &str,
        arguments: serde_json::Value,
    ) -> Result<String, McpError> {
        let decoded = self.call_tool(tool_name, arguments).await?;
        decoded
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| McpError::MalformedToolResult {
                tool: tool_name.to_string(),
                reason: "no text content block".into(),
            })
    }

    /// Call a tool and return its nested payload parsed as JSON.
    pub async fn invoke(
        &self,
        tool_name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, McpError> {
        let text = self.invoke_text(tool_name, arguments).await?;
        serde_json::from_str(&text).map_err(|e| McpError::MalformedToolResult {
            tool: tool_name.to_string(),
            reason: format!("text block is not JSON: {e}"),
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

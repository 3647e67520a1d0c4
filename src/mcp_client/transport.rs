//! JSON-RPC over HTTP transport.
//!
//! One POST per call, one connection per call. Collects the complete
//! response body before handing it back; never parses the envelope.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client as HttpClient;

use super::endpoint::Endpoint;
use super::errors::McpError;
use super::types::JsonRpcResponse;

// ─── Constants ───────────────────────────────────────────────────────────────

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest body excerpt quoted in a protocol error.
const BODY_EXCERPT_LEN: usize = 200;

// ─── Transport ───────────────────────────────────────────────────────────────

/// Stateless HTTP(S) transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: HttpClient,
    insecure_tls: bool,
}

impl HttpTransport {
    /// Build a transport.
    ///
    /// `insecure_tls` disables certificate validation for self-signed
    /// endpoints. The caller is responsible for surfacing that choice.
    pub fn new(insecure_tls: bool) -> Result<Self, McpError> {
        Self::with_connect_timeout(insecure_tls, CONNECT_TIMEOUT)
    }

    /// Build a transport with a custom TCP connect bound.
    pub fn with_connect_timeout(
        insecure_tls: bool,
        connect_timeout: Duration,
    ) -> Result<Self, McpError> {
        if insecure_tls {
            tracing::warn!("TLS certificate validation disabled for MCP endpoint");
        }

        let http = HttpClient::builder()
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(insecure_tls)
            .build()
            .map_err(|e| McpError::ConfigError {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { http, insecure_tls })
    }

    /// Whether certificate validation is relaxed.
    pub fn is_insecure(&self) -> bool {
        self.insecure_tls
    }

    /// POST `payload` to `endpoint` and return the complete response body.
    ///
    /// Fails with `Timeout` only if no complete response arrives within
    /// `timeout`; failing to connect at all is `ConnectionFailed`. A timed-out
    /// request is dropped; the remote operation may still be running.
    pub async fn send(
        &self,
        endpoint: &Endpoint,
        payload: String,
        timeout: Duration,
    ) -> Result<String, McpError> {
        let url = endpoint.url();
        let timeout_ms = timeout.as_millis() as u64;

        tokio::time::timeout(timeout, self.round_trip(&url, payload))
            .await
            .map_err(|_| McpError::Timeout {
                endpoint: url.clone(),
                timeout_ms,
            })?
    }

    async fn round_trip(&self, url: &str, payload: String) -> Result<String, McpError> {
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json, text/event-stream")
            .body(payload)
            .send()
            .await
            .map_err(|e| McpError::ConnectionFailed {
                endpoint: url.to_string(),
                reason: if e.is_connect() && e.is_timeout() {
                    format!("connect timed out: {e}")
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        let is_event_stream = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("text/event-stream"))
            .unwrap_or(false);

        let bytes = response.bytes().await.map_err(|e| McpError::Protocol {
            reason: format!("incomplete response body: {e}"),
        })?;

        let text = String::from_utf8(bytes.to_vec()).map_err(|_| McpError::Protocol {
            reason: "response body is not valid UTF-8".into(),
        })?;

        let body = if is_event_stream {
            first_event_data(&text).ok_or_else(|| McpError::Protocol {
                reason: "event stream closed before a data event".into(),
            })?
        } else {
            text
        };

        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            event_stream = is_event_stream,
            "response received"
        );

        if !status.is_success() && !is_error_envelope(&body) {
            return Err(McpError::Protocol {
                reason: format!("HTTP {}: {}", status.as_u16(), excerpt(&body)),
            });
        }

        Ok(body)
    }
}

// ─── Body Helpers ────────────────────────────────────────────────────────────

/// Join the `data:` lines of the first server-sent event.
fn first_event_data(stream: &str) -> Option<String> {
    let mut data: Vec<&str> = Vec::new();

    for line in stream.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            if !data.is_empty() {
                break;
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("data:") {
            data.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }

    if data.is_empty() {
        None
    } else {
        Some(data.join("\n"))
    }
}

/// Whether a non-2xx body still carries a JSON-RPC error worth reporting.
fn is_error_envelope(body: &str) -> bool {
    serde_json::from_str::<JsonRpcResponse>(body)
        .map(|r| r.error.is_some())
        .unwrap_or(false)
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_LEN {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(BODY_EXCERPT_LEN).collect();
    format!("{cut}…")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_data_single_line() {
        let stream = "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n\n";
        assert_eq!(
            first_event_data(stream).unwrap(),
            r#"{"jsonrpc":"2.0","id":1,"result":{}}"#
        );
    }

    #[test]
    fn test_first_event_data_multi_line_and_crlf() {
        let stream = "data: {\"a\":\r\ndata: 1}\r\n\r\ndata: ignored\n\n";
        assert_eq!(first_event_data(stream).unwrap(), "{\"a\":\n1}");
    }

    #[test]
    fn test_first_event_data_none() {
        assert!(first_event_data(": keep-alive\n\n").is_none());
    }

    #[test]
    fn test_is_error_envelope() {
        assert!(is_error_envelope(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32600,"message":"bad"}}"#
        ));
        assert!(!is_error_envelope("<html>502 Bad Gateway</html>"));
    }

    #[test]
    fn test_excerpt_truncates() {
        let long = "x".repeat(500);
        let cut = excerpt(&long);
        assert!(cut.ends_with('…'));
        assert_eq!(cut.chars().count(), BODY_EXCERPT_LEN + 1);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_failure() {
        // Non-routable address: either refused at once or the connect bound
        // elapses. Neither may be reported as a response timeout.
        let transport =
            HttpTransport::with_connect_timeout(false, Duration::from_millis(100)).unwrap();
        let endpoint = Endpoint::parse("http://10.255.255.1:81/mcp").unwrap();
        let err = transport
            .send(&endpoint, "{}".into(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::ConnectionFailed { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_silent_server_hits_call_bound() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let transport = HttpTransport::new(false).unwrap();
        let endpoint = Endpoint::parse(&format!("http://{addr}/mcp")).unwrap();
        let err = transport
            .send(&endpoint, "{}".into(), Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::Timeout { timeout_ms: 200, .. }));
    }

    #[tokio::test]
    async fn test_body_shorter_than_content_length_is_protocol_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 200\r\n\r\n{\"jsonrpc\":\"2.0\",\"id\":1,",
                )
                .await;
            let _ = socket.shutdown().await;
        });

        let transport = HttpTransport::new(false).unwrap();
        let endpoint = Endpoint::parse(&format!("http://{addr}/mcp")).unwrap();
        let err = transport
            .send(&endpoint, "{}".into(), Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            McpError::Protocol { reason } => assert!(reason.starts_with("incomplete response body")),
            other => panic!("expected Protocol, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = HttpTransport::new(false).unwrap();
        let endpoint = Endpoint::parse(&format!("http://127.0.0.1:{port}/mcp")).unwrap();
        let err = transport
            .send(&endpoint, "{}".into(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::ConnectionFailed { .. }));
    }
}

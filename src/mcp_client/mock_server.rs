//! Throwaway JSON-RPC server for tests.
//!
//! Binds `127.0.0.1:0`, records every request body, and answers with
//! whatever the scripted responder returns.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};

use super::{ClientOptions, Endpoint, McpClient};

/// One scripted reply.
pub enum MockReply {
    /// 200 with a JSON body.
    Json(Value),
    /// Arbitrary status, content type and raw body.
    Raw {
        status: u16,
        content_type: &'static str,
        body: String,
    },
    /// Sleep, then send the inner reply.
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    /// Success envelope echoing the request id.
    pub fn result_for(request: &Value, result: Value) -> Self {
        MockReply::Json(json!({"jsonrpc": "2.0", "id": request["id"], "result": result}))
    }

    /// Error envelope echoing the request id.
    pub fn error_for(request: &Value, code: i32, message: &str) -> Self {
        MockReply::Json(json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": {"code": code, "message": message}
        }))
    }

    /// `tools/call` success whose single text block is `text`.
    pub fn tool_text_for(request: &Value, text: &str) -> Self {
        Self::result_for(
            request,
            json!({"content": [{"type": "text", "text": text}]}),
        )
    }
}

type Responder = dyn Fn(&Value) -> MockReply + Send + Sync;

struct MockState {
    responder: Box<Responder>,
    requests: Mutex<Vec<Value>>,
}

/// Handle to a running mock server.
pub struct MockServer {
    pub url: String,
    state: Arc<MockState>,
}

impl MockServer {
    /// Start a server on an ephemeral port.
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Value) -> MockReply + Send + Sync + 'static,
    {
        let state = Arc::new(MockState {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/mcp", post(handle))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/mcp"),
            state,
        }
    }

    /// A client pointed at this server.
    pub fn client(&self, call_timeout: Duration) -> McpClient {
        let endpoint = Endpoint::parse(&self.url).unwrap();
        McpClient::new(
            endpoint,
            ClientOptions {
                call_timeout,
                insecure_tls: false,
            },
        )
        .unwrap()
    }

    /// Request bodies received so far, parsed as JSON.
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn handle(State(state): State<Arc<MockState>>, body: Bytes) -> Response {
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(request.clone());
    let reply = (state.responder)(&request);
    render(reply).await
}

async fn render(mut reply: MockReply) -> Response {
    loop {
        match reply {
            MockReply::Json(value) => return (StatusCode::OK, axum::Json(value)).into_response(),
            MockReply::Raw {
                status,
                content_type,
                body,
            } => {
                let status = StatusCode::from_u16(status).unwrap();
                return (status, [(header::CONTENT_TYPE, content_type)], body).into_response();
            }
            MockReply::Delayed(delay, inner) => {
                tokio::time::sleep(delay).await;
                reply = *inner;
            }
        }
    }
}

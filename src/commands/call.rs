//! `call`: invoke any tool by name with ad hoc arguments.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::mcp_client::{McpClient, McpError};

/// Bad `--arg` / `--json` input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("argument '{raw}' is not in key=value form")]
    MissingEquals { raw: String },

    #[error("argument '{raw}' has an empty key")]
    EmptyKey { raw: String },

    #[error("--json must be a JSON object: {reason}")]
    NotAnObject { reason: String },
}

/// Build a tool argument object.
///
/// `json_object` is the starting object; each `key=value` pair then sets one
/// key. A value that parses as JSON (`true`, `8080`, `["a"]`) is sent typed;
/// anything else is sent as a string.
pub fn build_arguments(json_object: Option<&str>, pairs: &[String]) -> Result<Value, ArgumentError> {
    let mut args = match json_object {
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(ArgumentError::NotAnObject {
                    reason: format!("got {}", type_name(&other)),
                })
            }
            Err(e) => {
                return Err(ArgumentError::NotAnObject {
                    reason: e.to_string(),
                })
            }
        },
        None => Map::new(),
    };

    for raw in pairs {
        let (key, value) = raw.split_once('=').ok_or_else(|| ArgumentError::MissingEquals {
            raw: raw.clone(),
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ArgumentError::EmptyKey { raw: raw.clone() });
        }
        let value = serde_json::from_str::<Value>(value)
            .unwrap_or_else(|_| Value::String(value.to_string()));
        args.insert(key.to_string(), value);
    }

    Ok(Value::Object(args))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Result of a generic call: a decoded payload when the text block is JSON,
/// otherwise the text itself.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutput {
    Json(Value),
    Text(String),
}

/// Invoke `tool` and decode whatever it returns.
pub async fn call(client: &McpClient, tool: &str, arguments: Value) -> Result<CallOutput, McpError> {
    let text = client.invoke_text(tool, arguments).await?;
    Ok(match serde_json::from_str::<Value>(&text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => CallOutput::Json(value),
        _ => CallOutput::Text(text),
    })
}

impl fmt::Display for CallOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallOutput::Json(value) => {
                let pretty = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                writeln!(f, "{pretty}")
            }
            CallOutput::Text(text) if text.ends_with('\n') => f.write_str(text),
            CallOutput::Text(text) => writeln!(f, "{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::mcp_client::mock_server::{MockReply, MockServer};

    #[test]
    fn test_build_arguments_typed_values() {
        let args = build_arguments(
            None,
            &[
                "image_name=quay.io/acme/web:1.0".into(),
                "no_cache=true".into(),
                "port=8080".into(),
                "tags=[\"a\",\"b\"]".into(),
                "query=a=b".into(),
            ],
        )
        .unwrap();
        assert_eq!(
            args,
            json!({
                "image_name": "quay.io/acme/web:1.0",
                "no_cache": true,
                "port": 8080,
                "tags": ["a", "b"],
                "query": "a=b"
            })
        );
    }

    #[test]
    fn test_build_arguments_pairs_override_json() {
        let args = build_arguments(Some(r#"{"namespace": "a", "keep": 1}"#), &["namespace=b".into()])
            .unwrap();
        assert_eq!(args, json!({"namespace": "b", "keep": 1}));
    }

    #[test]
    fn test_build_arguments_errors() {
        assert_eq!(
            build_arguments(None, &["novalue".into()]),
            Err(ArgumentError::MissingEquals {
                raw: "novalue".into()
            })
        );
        assert!(matches!(
            build_arguments(None, &["=x".into()]),
            Err(ArgumentError::EmptyKey { .. })
        ));
        assert!(matches!(
            build_arguments(Some("[1,2]"), &[]),
            Err(ArgumentError::NotAnObject { .. })
        ));
        assert!(matches!(
            build_arguments(Some("{oops"), &[]),
            Err(ArgumentError::NotAnObject { .. })
        ));
    }

    #[tokio::test]
    async fn test_call_json_and_text_outputs() {
        let server = MockServer::start(|req| {
            if req["params"]["name"] == "container_list" {
                MockReply::tool_text_for(req, r#"{"images": []}"#)
            } else {
                MockReply::tool_text_for(req, "42")
            }
        })
        .await;
        let client = server.client(Duration::from_secs(5));

        let out = call(&client, "container_list", json!({})).await.unwrap();
        assert_eq!(out, CallOutput::Json(json!({"images": []})));
        assert!(out.to_string().contains("\"images\": []"));

        let out = call(&client, "projects_list", json!({})).await.unwrap();
        assert_eq!(out, CallOutput::Text("42".into()));
        assert_eq!(out.to_string(), "42\n");
    }
}

//! `pods`: list pods cluster-wide or in one namespace.

use serde_json::json;

use crate::interpret::{self, ListSummary};
use crate::mcp_client::{McpClient, McpError};

pub const PODS_LIST_TOOL: &str = "pods_list";
pub const PODS_IN_NAMESPACE_TOOL: &str = "pods_list_in_namespace";

/// List pods. The output is the server's text, unparsed.
pub async fn list_pods(client: &McpClient, namespace: Option<&str>) -> Result<ListSummary, McpError> {
    let (tool, args) = match namespace.map(str::trim).filter(|ns| !ns.is_empty()) {
        Some(ns) => (PODS_IN_NAMESPACE_TOOL, json!({ "namespace": ns })),
        None => (PODS_LIST_TOOL, json!({})),
    };

    let text = client.invoke_text(tool, args).await?;
    Ok(interpret::list::interpret(tool, text))
}

//! `deploy`: automated repository deployment.

use serde_json::{json, Map, Value};

use crate::interpret::{self, DeploySummary};
use crate::mcp_client::{McpClient, McpError};

/// Remote tool name.
pub const DEPLOY_TOOL: &str = "repo_auto_deploy";

/// Arguments for one deployment.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub repo_url: String,
    pub namespace: String,
    pub app_name: Option<String>,
    pub branch: Option<String>,
    pub port: Option<u16>,
}

impl DeployRequest {
    pub fn new(repo_url: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            namespace: namespace.into(),
            app_name: None,
            branch: None,
            port: None,
        }
    }

    pub fn arguments(&self) -> Value {
        let mut args = Map::new();
        args.insert("url".into(), json!(self.repo_url));
        args.insert("namespace".into(), json!(self.namespace));
        if let Some(name) = &self.app_name {
            args.insert("name".into(), json!(name));
        }
        if let Some(branch) = &self.branch {
            args.insert("branch".into(), json!(branch));
        }
        if let Some(port) = self.port {
            args.insert("port".into(), json!(port));
        }
        Value::Object(args)
    }
}

/// Invoke the deployment tool and interpret its payload.
pub async fn deploy(client: &McpClient, request: &DeployRequest) -> Result<DeploySummary, McpError> {
    tracing::info!(
        repo = %request.repo_url,
        namespace = %request.namespace,
        "starting automated deploy"
    );
    let payload = client.invoke(DEPLOY_TOOL, request.arguments()).await?;
    Ok(interpret::deploy::interpret(&payload))
}

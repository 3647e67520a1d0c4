//! `build`: run a container build with UBI validation and summarize it.
//!
//! Validation and security scanning are on unless explicitly disabled. The
//! bare CLI flow never writes a remediation artifact; it only reports the
//! proposal so the user can run `remediate` separately.

use std::fmt;

use serde_json::{json, Map, Value};

use crate::interpret::{self, BuildSummary, RemediationProposal};
use crate::mcp_client::{McpClient, McpError};

/// Remote tool name.
pub const BUILD_TOOL: &str = "container_build";

/// Arguments for one build.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub source: String,
    pub image_name: String,
    pub dockerfile: Option<String>,
    pub git_branch: Option<String>,
    pub validate_ubi: bool,
    pub security_scan: bool,
}

impl BuildRequest {
    /// A request with validation and scanning enabled.
    pub fn new(source: impl Into<String>, image_name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            image_name: image_name.into(),
            dockerfile: None,
            git_branch: None,
            validate_ubi: true,
            security_scan: true,
        }
    }

    /// Tool arguments. Optional fields are omitted rather than sent as null.
    pub fn arguments(&self) -> Value {
        let mut args = Map::new();
        args.insert("source".into(), json!(self.source));
        args.insert("image_name".into(), json!(self.image_name));
        args.insert("validate_ubi".into(), json!(self.validate_ubi));
        args.insert("security_scan".into(), json!(self.security_scan));
        if let Some(dockerfile) = &self.dockerfile {
            args.insert("dockerfile".into(), json!(dockerfile));
        }
        if let Some(branch) = &self.git_branch {
            args.insert("git_branch".into(), json!(branch));
        }
        Value::Object(args)
    }
}

/// Build summary plus the follow-up the summary implies, if any.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub summary: BuildSummary,
    pub proposal: Option<RemediationProposal>,
}

/// Invoke the build tool and interpret its payload.
pub async fn build(client: &McpClient, request: &BuildRequest) -> Result<BuildReport, McpError> {
    tracing::info!(
        source = %request.source,
        image = %request.image_name,
        validate_ubi = request.validate_ubi,
        "starting container build"
    );

    let payload = client.invoke(BUILD_TOOL, request.arguments()).await?;
    let summary = interpret::build::interpret(&payload);
    let proposal = interpret::build::decide(&summary);

    Ok(BuildReport { summary, proposal })
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)?;
        if let Some(proposal) = &self.proposal {
            writeln!(
                f,
                "To scaffold {} from it, run: openshift-mcp remediate {}",
                proposal.target_path.display(),
                proposal.suggested_base
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::mcp_client::mock_server::{MockReply, MockServer};
    use crate::remediation;

    const NODE_UBI: &str = "registry.access.redhat.com/ubi8/nodejs-18:latest";

    #[test]
    fn test_arguments_default_flags_enabled() {
        let args = BuildRequest::new("https://github.com/acme/web.git", "quay.io/acme/web:1.0")
            .arguments();
        assert_eq!(args["source"], "https://github.com/acme/web.git");
        assert_eq!(args["image_name"], "quay.io/acme/web:1.0");
        assert_eq!(args["validate_ubi"], true);
        assert_eq!(args["security_scan"], true);
        assert!(args.get("dockerfile").is_none());
        assert!(args.get("git_branch").is_none());
    }

    #[test]
    fn test_arguments_optional_fields() {
        let mut request = BuildRequest::new(".", "web");
        request.dockerfile = Some("Containerfile".into());
        request.git_branch = Some("release".into());
        request.security_scan = false;
        let args = request.arguments();
        assert_eq!(args["dockerfile"], "Containerfile");
        assert_eq!(args["git_branch"], "release");
        assert_eq!(args["security_scan"], false);
    }

    #[tokio::test]
    async fn test_scenario_non_compliant_build_to_artifact() {
        let payload = json!({"is_ubi": false, "suggested_ubi_image": NODE_UBI}).to_string();
        let server = MockServer::start(move |req| MockReply::tool_text_for(req, &payload)).await;
        let client = server.client(Duration::from_secs(5));

        let report = build(&client, &BuildRequest::new(".", "web")).await.unwrap();

        let verdict = report.summary.verdict.as_ref().unwrap();
        assert!(!verdict.is_compliant());
        assert_eq!(verdict.suggested_base(), Some(NODE_UBI));
        let text = report.to_string();
        assert!(text.contains("NOT compliant"));
        assert!(text.contains(NODE_UBI));

        let proposal = report.proposal.unwrap();
        let artifact = remediation::synthesize(&proposal.suggested_base).unwrap();
        assert!(artifact.content.lines().any(|l| l == format!("FROM {NODE_UBI}")));

        let sent = &server.requests()[0];
        assert_eq!(sent["params"]["name"], BUILD_TOOL);
        assert_eq!(sent["params"]["arguments"]["validate_ubi"], true);
    }

    #[tokio::test]
    async fn test_compliant_build_has_no_hint() {
        let server = MockServer::start(|req| {
            MockReply::tool_text_for(
                req,
                r#"{"image_name":"web","ubi_compliance":{"is_ubi":true}}"#,
            )
        })
        .await;
        let client = server.client(Duration::from_secs(5));

        let report = build(&client, &BuildRequest::new(".", "web")).await.unwrap();
        assert!(report.proposal.is_none());
        assert!(!report.to_string().contains("remediate"));
    }

    #[tokio::test]
    async fn test_timeout_produces_no_summary() {
        let server = MockServer::start(|req| {
            MockReply::Delayed(
                Duration::from_secs(3),
                Box::new(MockReply::tool_text_for(req, r#"{"is_ubi":false}"#)),
            )
        })
        .await;
        let client = server.client(Duration::from_millis(200));

        let result = build(&client, &BuildRequest::new(".", "web")).await;
        assert!(matches!(result, Err(McpError::Timeout { .. })));
    }
}

//! Deploy result interpreter.
//!
//! A missing URL is normal (backend-only workloads have no route) and is
//! never reported as a problem.

use std::fmt;

use serde_json::Value;

use super::errors::InterpretError;
use super::first_str;

const TOOL: &str = "deploy";

/// Caller-facing summary of a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploySummary {
    pub app_name: Option<String>,
    pub namespace: Option<String>,
    pub url: Option<String>,
    pub applied: Option<bool>,
    pub message: Option<String>,
    pub warnings: Vec<InterpretError>,
}

/// Interpret a decoded `repo_auto_deploy` payload.
pub fn interpret(payload: &Value) -> DeploySummary {
    let mut warnings = Vec::new();

    let app_name = first_str(
        payload,
        &["/application/name", "/application_name", "/name", "/repository/name"],
    );
    if app_name.is_none() {
        warnings.push(InterpretError::MissingField {
            tool: TOOL,
            field: "application.name",
        });
    }

    let namespace = first_str(payload, &["/application/namespace", "/namespace"]);
    if namespace.is_none() {
        warnings.push(InterpretError::MissingField {
            tool: TOOL,
            field: "application.namespace",
        });
    }

    DeploySummary {
        app_name,
        namespace,
        url: first_str(payload, &["/application_url", "/application/url"]),
        applied: payload.get("applied").and_then(Value::as_bool),
        message: first_str(payload, &["/message"]),
        warnings,
    }
}

impl fmt::Display for DeploySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Application: {}",
            self.app_name.as_deref().unwrap_or("(not reported)")
        )?;
        writeln!(
            f,
            "Namespace:   {}",
            self.namespace.as_deref().unwrap_or("(not reported)")
        )?;
        if let Some(url) = &self.url {
            writeln!(f, "URL:         {url}")?;
        }
        match self.applied {
            Some(true) => writeln!(f, "Applied:     yes")?,
            Some(false) => writeln!(f, "Applied:     no (manifests generated only)")?,
            None => {}
        }
        if let Some(message) = &self.message {
            writeln!(f, "Status:      {message}")?;
        }
        for w in &self.warnings {
            writeln!(f, "Note: {w}")?;
        }
        Ok(())
    }
}

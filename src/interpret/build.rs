//! Build result interpreter.
//!
//! Extracts the image, timing, runtime and UBI compliance verdict from a
//! `container_build` payload, and decides whether a UBI scaffold should be
//! proposed.

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;

use super::errors::InterpretError;
use super::{first_str, str_list};
use crate::remediation::{artifact_file_name, UBI_VARIANT};

const TOOL: &str = "build";

/// Where the server may place the compliance block, checked in order.
/// The empty pointer is the payload root.
const VERDICT_LOCATIONS: &[&str] = &[
    "",
    "/ubi_compliance",
    "/ubi_validation",
    "/validation/ubi_compliance",
];

// ─── Types ───────────────────────────────────────────────────────────────────

/// Whether the build's base image meets the UBI policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceVerdict {
    is_compliant: bool,
    current_base: Option<String>,
    suggested_base: Option<String>,
}

impl ComplianceVerdict {
    /// Build a verdict. A suggestion is discarded when the image is compliant.
    pub fn new(
        is_compliant: bool,
        current_base: Option<String>,
        suggested_base: Option<String>,
    ) -> Self {
        Self {
            is_compliant,
            current_base,
            suggested_base: if is_compliant { None } else { suggested_base },
        }
    }

    pub fn is_compliant(&self) -> bool {
        self.is_compliant
    }

    pub fn current_base(&self) -> Option<&str> {
        self.current_base.as_deref()
    }

    pub fn suggested_base(&self) -> Option<&str> {
        self.suggested_base.as_deref()
    }
}

/// Caller-facing summary of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub image_name: Option<String>,
    pub build_duration: Option<String>,
    pub container_runtime: Option<String>,
    pub message: Option<String>,
    pub verdict: Option<ComplianceVerdict>,
    pub validation_message: Option<String>,
    pub security_warnings: Vec<String>,
    pub warnings: Vec<InterpretError>,
}

/// A suggested follow-up: write a UBI scaffold to `target_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationProposal {
    pub suggested_base: String,
    pub target_path: PathBuf,
}

// ─── Interpretation ──────────────────────────────────────────────────────────

/// Interpret a decoded `container_build` payload.
pub fn interpret(payload: &Value) -> BuildSummary {
    let mut warnings = Vec::new();

    let verdict_block = VERDICT_LOCATIONS
        .iter()
        .filter_map(|p| payload.pointer(p))
        .find(|block| block.get("is_ubi").is_some_and(Value::is_boolean));

    let verdict = match verdict_block {
        Some(block) => {
            let is_compliant = block["is_ubi"].as_bool().unwrap_or(false);
            let suggested = first_str(block, &["/suggested_ubi_image"]);
            if !is_compliant && suggested.is_none() {
                warnings.push(InterpretError::MissingField {
                    tool: TOOL,
                    field: "suggested_ubi_image",
                });
            }
            Some(ComplianceVerdict::new(
                is_compliant,
                first_str(block, &["/current_base_image"]),
                suggested,
            ))
        }
        None => {
            warnings.push(InterpretError::MissingField {
                tool: TOOL,
                field: "is_ubi",
            });
            None
        }
    };

    let validation_message = VERDICT_LOCATIONS
        .iter()
        .filter_map(|p| payload.pointer(p))
        .find_map(|block| first_str(block, &["/validation_message"]));

    let mut security_warnings = str_list(payload, "/security_warnings");
    if security_warnings.is_empty() {
        security_warnings = str_list(payload, "/validation/security_warnings");
    }

    let summary = BuildSummary {
        image_name: first_str(payload, &["/image_name", "/image_info/image_name"]),
        build_duration: first_str(payload, &["/build_duration", "/image_info/build_duration"]),
        container_runtime: first_str(payload, &["/container_runtime", "/runtime"]),
        message: first_str(payload, &["/message"]),
        verdict,
        validation_message,
        security_warnings,
        warnings,
    };

    tracing::debug!(
        image = summary.image_name.as_deref().unwrap_or("-"),
        compliant = summary.verdict.as_ref().map(ComplianceVerdict::is_compliant),
        warnings = summary.warnings.len(),
        "interpreted build result"
    );

    summary
}

/// Propose a UBI scaffold iff the image is non-compliant and a suggestion exists.
pub fn decide(summary: &BuildSummary) -> Option<RemediationProposal> {
    let verdict = summary.verdict.as_ref()?;
    if verdict.is_compliant() {
        return None;
    }
    let suggested = verdict.suggested_base()?;
    Some(RemediationProposal {
        suggested_base: suggested.to_string(),
        target_path: PathBuf::from(artifact_file_name(UBI_VARIANT)),
    })
}

// ─── Display ─────────────────────────────────────────────────────────────────

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Image:    {}",
            self.image_name.as_deref().unwrap_or("(not reported)")
        )?;
        if let Some(message) = &self.message {
            writeln!(f, "Status:   {message}")?;
        }
        if let Some(duration) = &self.build_duration {
            writeln!(f, "Duration: {duration}")?;
        }
        if let Some(runtime) = &self.container_runtime {
            writeln!(f, "Runtime:  {runtime}")?;
        }

        match &self.verdict {
            Some(v) if v.is_compliant() => {
                write!(f, "UBI:      compliant")?;
                if let Some(base) = v.current_base() {
                    write!(f, " (base image {base})")?;
                }
                writeln!(f)?;
            }
            Some(v) => {
                write!(f, "UBI:      NOT compliant")?;
                if let Some(base) = v.current_base() {
                    write!(f, " (base image {base})")?;
                }
                writeln!(f)?;
                if let Some(suggested) = v.suggested_base() {
                    writeln!(f, "Suggested base image: {suggested}")?;
                }
            }
            None => writeln!(f, "UBI:      unknown")?,
        }

        if let Some(msg) = &self.validation_message {
            writeln!(f, "Validation: {msg}")?;
        }

        if !self.security_warnings.is_empty() {
            writeln!(f, "Security warnings:")?;
            for w in &self.security_warnings {
                writeln!(f, "  - {w}")?;
            }
        }

        for w in &self.warnings {
            writeln!(f, "Note: {w}; recommendation omitted")?;
        }

        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

//! `remediate`: write a UBI Dockerfile scaffold for a suggested base image.

use std::fmt;
use std::path::Path;

use crate::remediation::{self, RemediationError, WriteOutcome};

/// Outcome of one remediation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationReport {
    pub base_image: String,
    pub outcome: WriteOutcome,
}

/// Render the scaffold and write it into `dir`.
///
/// `confirm_overwrite` decides whether an existing scaffold may be replaced.
pub fn remediate<F>(
    suggested_base: &str,
    dir: &Path,
    confirm_overwrite: F,
) -> Result<RemediationReport, RemediationError>
where
    F: FnOnce(&Path) -> bool,
{
    let artifact = remediation::synthesize(suggested_base)?;
    let outcome = remediation::write_artifact(&artifact, dir, confirm_overwrite)?;
    Ok(RemediationReport {
        base_image: suggested_base.trim().to_string(),
        outcome,
    })
}

impl fmt::Display for RemediationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.outcome.notice())?;
        if !matches!(self.outcome, WriteOutcome::SkippedExisting(_)) {
            writeln!(f, "Base image: {}", self.base_image)?;
            let file_name = self
                .outcome
                .path()
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default();
            writeln!(
                f,
                "Review it, then build with: openshift-mcp build <source> <image> --dockerfile {file_name}"
            )?;
        }
        Ok(())
    }
}

//! Remediation error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while synthesizing or writing an artifact.
#[derive(Debug, Error)]
pub enum RemediationError {
    /// The suggested base image cannot be placed on a `FROM` line.
    #[error("invalid base image '{image}': {reason}")]
    InvalidBaseImage { image: String, reason: String },

    /// Filesystem write failed.
    #[error("failed to write {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },
}

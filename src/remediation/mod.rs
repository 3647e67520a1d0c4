//! Remediation synthesizer: scaffolds a UBI-based Dockerfile.
//!
//! Renders a fixed template substituting only the base image. The original
//! Dockerfile is never read or merged; this is a starting point, not a
//! migration. Writing is a separate, caller-confirmed step that never
//! replaces an existing file without consent.

pub mod errors;

pub use errors::RemediationError;

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

// ─── Constants ───────────────────────────────────────────────────────────────

/// Name of the primary Dockerfile. Generated artifacts never use it.
pub const PRIMARY_DOCKERFILE: &str = "Dockerfile";

/// Variant suffix for UBI scaffolds (`Dockerfile.ubi`).
pub const UBI_VARIANT: &str = "ubi";

/// Port declared by the scaffold.
pub const SCAFFOLD_PORT: u16 = 8080;

const BASE_IMAGE_PLACEHOLDER: &str = "{base_image}";
const PORT_PLACEHOLDER: &str = "{port}";

const DOCKERFILE_TEMPLATE: &str = "\
# Generated UBI-based Dockerfile scaffold. Review before use.
FROM {base_image}

WORKDIR /opt/app-root/src

USER 0
COPY . .
RUN (id -u 1001 >/dev/null 2>&1 || useradd -u 1001 -r -g 0 -d /opt/app-root -s /sbin/nologin appuser) && \\
    chown -R 1001:0 /opt/app-root/src && \\
    chmod -R g=u /opt/app-root/src
USER 1001

EXPOSE {port}

CMD [\"npm\", \"start\"]
";

// ─── Artifact ────────────────────────────────────────────────────────────────

/// A generated file and the name it should be written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationArtifact {
    pub file_name: String,
    pub content: String,
}

impl RemediationArtifact {
    /// Target path inside `dir`.
    pub fn target_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }
}

/// `Dockerfile.<variant>`.
pub fn artifact_file_name(variant: &str) -> String {
    format!("{PRIMARY_DOCKERFILE}.{variant}")
}

/// Render the scaffold for `suggested_base`.
///
/// Deterministic: the same image always yields byte-identical content.
pub fn synthesize(suggested_base: &str) -> Result<RemediationArtifact, RemediationError> {
    let base = suggested_base.trim();
    if base.is_empty() {
        return Err(RemediationError::InvalidBaseImage {
            image: suggested_base.to_string(),
            reason: "image reference is empty".into(),
        });
    }
    if base.chars().any(char::is_whitespace) {
        return Err(RemediationError::InvalidBaseImage {
            image: suggested_base.to_string(),
            reason: "image reference contains whitespace".into(),
        });
    }

    Ok(RemediationArtifact {
        file_name: artifact_file_name(UBI_VARIANT),
        content: DOCKERFILE_TEMPLATE
            .replace(PORT_PLACEHOLDER, &SCAFFOLD_PORT.to_string())
            .replace(BASE_IMAGE_PLACEHOLDER, base),
    })
}

// ─── Writing ─────────────────────────────────────────────────────────────────

/// What happened when writing an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Created(PathBuf),
    Overwritten(PathBuf),
    /// The target existed and the caller declined to replace it.
    SkippedExisting(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Created(p) | WriteOutcome::Overwritten(p) | WriteOutcome::SkippedExisting(p) => p,
        }
    }

    /// One-line notice for the user.
    pub fn notice(&self) -> String {
        match self {
            WriteOutcome::Created(p) => format!("Wrote {}", p.display()),
            WriteOutcome::Overwritten(p) => format!("Overwrote {}", p.display()),
            WriteOutcome::SkippedExisting(p) => format!(
                "{} already exists; left unchanged (re-run with confirmation to replace it)",
                p.display()
            ),
        }
    }
}

/// Write `artifact` into `dir`.
///
/// If the target already exists, `confirm_overwrite` is asked; a `false`
/// answer leaves the file untouched and returns `SkippedExisting`.
pub fn write_artifact<F>(
    artifact: &RemediationArtifact,
    dir: &Path,
    confirm_overwrite: F,
) -> Result<WriteOutcome, RemediationError>
where
    F: FnOnce(&Path) -> bool,
{
    let path = artifact.target_path(dir);

    let created = create_exclusive(&path, |file| file.write_all(artifact.content.as_bytes()));

    match created {
        Ok(()) => {
            tracing::info!(path = %path.display(), "remediation artifact created");
            Ok(WriteOutcome::Created(path))
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            if !confirm_overwrite(&path) {
                tracing::info!(path = %path.display(), "remediation artifact exists, skipped");
                return Ok(WriteOutcome::SkippedExisting(path));
            }
            std::fs::write(&path, &artifact.content).map_err(|e| RemediationError::Io {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            tracing::info!(path = %path.display(), "remediation artifact overwritten");
            Ok(WriteOutcome::Overwritten(path))
        }
        Err(e) => Err(RemediationError::Io {
            path,
            reason: e.to_string(),
        }),
    }
}

/// Create `path` only if it does not exist, then fill it with `write`.
///
/// A failed `write` removes the file again so no partial artifact is left.
fn create_exclusive<W>(path: &Path, write: W) -> io::Result<()>
where
    W: FnOnce(&mut File) -> io::Result<()>,
{
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(e) = write(&mut file) {
        drop(file);
        if let Err(cleanup) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %cleanup, "could not remove partial artifact");
        }
        return Err(e);
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const NODE_UBI: &str = "registry.access.redhat.com/ubi8/nodejs-18:latest";

    #[test]
    fn test_synthesize_base_image_line() {
        let artifact = synthesize(NODE_UBI).unwrap();
        assert_eq!(artifact.file_name, "Dockerfile.ubi");
        let from_lines: Vec<&str> = artifact
            .content
            .lines()
            .filter(|l| l.starts_with("FROM "))
            .collect();
        assert_eq!(from_lines, vec![format!("FROM {NODE_UBI}").as_str()]);
    }

    #[test]
    fn test_synthesize_template_sections() {
        let content = synthesize(NODE_UBI).unwrap().content;
        assert!(content.contains("WORKDIR /opt/app-root/src"));
        assert!(content.contains("useradd -u 1001"));
        assert!(content.contains("USER 1001"));
        assert!(content.contains(&format!("EXPOSE {SCAFFOLD_PORT}")));
        assert!(content.contains("CMD [\"npm\", \"start\"]"));
        assert!(!content.contains(BASE_IMAGE_PLACEHOLDER));
        assert!(!content.contains(PORT_PLACEHOLDER));
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        assert_eq!(synthesize(NODE_UBI).unwrap(), synthesize(NODE_UBI).unwrap());
    }

    #[test]
    fn test_synthesize_rejects_bad_images() {
        assert!(synthesize("").is_err());
        assert!(synthesize("   ").is_err());
        assert!(synthesize("ubi8\nRUN rm -rf /").is_err());
    }

    #[test]
    fn test_artifact_never_targets_primary_dockerfile() {
        assert_ne!(artifact_file_name(UBI_VARIANT), PRIMARY_DOCKERFILE);
    }

    #[test]
    fn test_write_creates_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = synthesize(NODE_UBI).unwrap();

        let outcome = write_artifact(&artifact, dir.path(), |_| panic!("not asked")).unwrap();
        assert_eq!(outcome, WriteOutcome::Created(dir.path().join("Dockerfile.ubi")));
        let written = std::fs::read_to_string(outcome.path()).unwrap();
        assert_eq!(written, artifact.content);
    }

    #[test]
    fn test_write_existing_declined_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Dockerfile.ubi");
        std::fs::write(&target, "FROM hand-edited\n").unwrap();
        let artifact = synthesize(NODE_UBI).unwrap();

        let mut asked = None;
        let outcome = write_artifact(&artifact, dir.path(), |p| {
            asked = Some(p.to_path_buf());
            false
        })
        .unwrap();

        assert_eq!(asked.as_deref(), Some(target.as_path()));
        assert!(matches!(outcome, WriteOutcome::SkippedExisting(_)));
        assert!(outcome.notice().contains("left unchanged"));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "FROM hand-edited\n");
    }

    #[test]
    fn test_write_existing_confirmed_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Dockerfile.ubi");
        std::fs::write(&target, "old").unwrap();
        let artifact = synthesize(NODE_UBI).unwrap();

        let outcome = write_artifact(&artifact, dir.path(), |_| true).unwrap();
        assert_eq!(outcome, WriteOutcome::Overwritten(target.clone()));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), artifact.content);
    }

    #[test]
    fn test_write_leaves_primary_dockerfile_alone() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join(PRIMARY_DOCKERFILE);
        std::fs::write(&primary, "FROM node:18\n").unwrap();

        write_artifact(&synthesize(NODE_UBI).unwrap(), dir.path(), |_| true).unwrap();
        assert_eq!(std::fs::read_to_string(&primary).unwrap(), "FROM node:18\n");
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Dockerfile.ubi");

        let err = create_exclusive(&path, |file| {
            file.write_all(b"FROM partial")?;
            Err(io::Error::other("disk full"))
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(!path.exists());

        // The next run creates the file without asking about an existing one.
        let outcome =
            write_artifact(&synthesize(NODE_UBI).unwrap(), dir.path(), |_| panic!("not asked"))
                .unwrap();
        assert!(matches!(outcome, WriteOutcome::Created(_)));
    }

    #[test]
    fn test_write_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = write_artifact(&synthesize(NODE_UBI).unwrap(), &missing, |_| true).unwrap_err();
        assert!(matches!(err, RemediationError::Io { .. }));
    }
}

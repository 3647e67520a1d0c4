//! `config show` / `config set-endpoint`.
//!
//! Reads and writes the same settings file the client resolves from, so the
//! values shown are the ones the next command will use.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{self, ConfigError, ResolvedConfig, Source};
use crate::mcp_client::Endpoint;

/// Effective settings and where each came from.
#[derive(Debug, Clone)]
pub struct SettingsView {
    pub settings_path: PathBuf,
    pub resolved: ResolvedConfig,
}

pub fn show(settings_path: &Path, resolved: &ResolvedConfig) -> SettingsView {
    SettingsView {
        settings_path: settings_path.to_path_buf(),
        resolved: resolved.clone(),
    }
}

impl fmt::Display for SettingsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.resolved;
        writeln!(f, "Endpoint:      {} ({})", r.endpoint, r.endpoint_source.label())?;
        writeln!(f, "Call timeout:  {}s", r.call_timeout.as_secs())?;
        writeln!(
            f,
            "Insecure TLS:  {} ({})",
            if r.insecure_tls { "yes" } else { "no" },
            r.insecure_source.label()
        )?;
        writeln!(f, "Settings file: {}", self.settings_path.display())?;
        if r.endpoint_source == Source::Default {
            writeln!(
                f,
                "Set {} or run `openshift-mcp config set-endpoint <url>` to change the endpoint.",
                config::ENDPOINT_ENV
            )?;
        }
        Ok(())
    }
}

/// Validate and persist a new endpoint. Returns the normalized endpoint.
pub fn set_endpoint(settings_path: &Path, raw: &str) -> Result<Endpoint, ConfigError> {
    let endpoint = Endpoint::parse(raw).map_err(|e| ConfigError::Invalid {
        setting: "endpoint",
        source_name: Source::Flag.label(),
        reason: e.to_string(),
    })?;
    config::save_endpoint(settings_path, &endpoint)?;
    Ok(endpoint)
}

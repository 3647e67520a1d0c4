//! Client configuration loading and resolution.
//!
//! Every setting resolves in the same order: CLI flag, environment
//! variable, persisted settings file, built-in default. The settings file is
//! shared with the editor integration, which writes the same `endpoint` key.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mcp_client::{ClientOptions, Endpoint, DEFAULT_CALL_TIMEOUT};

// ─── Constants ───────────────────────────────────────────────────────────────

/// Endpoint override variable.
pub const ENDPOINT_ENV: &str = "OPENSHIFT_MCP_ENDPOINT";

/// Round-trip bound override, in seconds.
pub const TIMEOUT_ENV: &str = "OPENSHIFT_MCP_TIMEOUT_SECS";

/// Relaxed TLS override (`1`/`true`/`yes`/`on`).
pub const INSECURE_ENV: &str = "OPENSHIFT_MCP_INSECURE";

/// Settings file name inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Configuration loading or validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {setting} from {source_name}: {reason}")]
    Invalid {
        setting: &'static str,
        source_name: &'static str,
        reason: String,
    },

    #[error("cannot read settings file {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("cannot parse settings file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("cannot write settings file {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

// ─── Settings File ───────────────────────────────────────────────────────────

/// Persisted settings. Every field is optional; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure_tls: Option<bool>,
}

/// Default settings file location.
pub fn settings_path() -> PathBuf {
    crate::data_dir().join(SETTINGS_FILE)
}

/// Load settings from `path`. A missing file yields defaults.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Persist the endpoint, keeping every other key already in the file.
///
/// A file that is not a JSON object is replaced, so a corrupted settings file
/// can always be repaired from the CLI.
pub fn save_endpoint(path: &Path, endpoint: &Endpoint) -> Result<(), ConfigError> {
    let write_err = |reason: String| ConfigError::Write {
        path: path.to_path_buf(),
        reason,
    };

    let mut doc = match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!(path = %path.display(), "settings file is not a JSON object, replacing it");
                serde_json::Map::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "settings file is unparsable, replacing it");
                serde_json::Map::new()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => serde_json::Map::new(),
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };
    doc.insert(
        "endpoint".to_string(),
        serde_json::Value::String(endpoint.url()),
    );

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }
    let pretty = serde_json::to_string_pretty(&doc).map_err(|e| write_err(e.to_string()))?;
    std::fs::write(path, pretty + "\n").map_err(|e| write_err(e.to_string()))?;

    tracing::info!(path = %path.display(), endpoint = %endpoint, "endpoint saved");
    Ok(())
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Flag,
    Environment,
    SettingsFile,
    Default,
}

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Source::Flag => "command-line flag",
            Source::Environment => "environment",
            Source::SettingsFile => "settings file",
            Source::Default => "default",
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub insecure_tls: bool,
}

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: Endpoint,
    pub endpoint_source: Source,
    pub call_timeout: Duration,
    pub insecure_tls: bool,
    pub insecure_source: Source,
}

impl ResolvedConfig {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            call_timeout: self.call_timeout,
            insecure_tls: self.insecure_tls,
        }
    }
}

/// Resolve against the process environment.
pub fn resolve(overrides: &Overrides, settings: &Settings) -> Result<ResolvedConfig, ConfigError> {
    resolve_with(overrides, settings, |key| std::env::var(key).ok())
}

/// Resolve with an injectable environment lookup.
pub fn resolve_with<E>(
    overrides: &Overrides,
    settings: &Settings,
    env: E,
) -> Result<ResolvedConfig, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let env_nonempty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    // Endpoint
    let (raw_endpoint, endpoint_source) = if let Some(v) = &overrides.endpoint {
        (Some(v.clone()), Source::Flag)
    } else if let Some(v) = env_nonempty(ENDPOINT_ENV) {
        (Some(v), Source::Environment)
    } else if let Some(v) = settings.endpoint.clone().filter(|v| !v.trim().is_empty()) {
        (Some(v), Source::SettingsFile)
    } else {
        (None, Source::Default)
    };

    let endpoint = match raw_endpoint {
        Some(raw) => Endpoint::parse(&raw).map_err(|e| ConfigError::Invalid {
            setting: "endpoint",
            source_name: endpoint_source.label(),
            reason: e.to_string(),
        })?,
        None => Endpoint::default_endpoint(),
    };

    // Timeout
    let timeout_secs = if let Some(v) = overrides.timeout_secs {
        Some((v, Source::Flag))
    } else if let Some(v) = env_nonempty(TIMEOUT_ENV) {
        let secs = v.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
            setting: "timeout",
            source_name: Source::Environment.label(),
            reason: format!("'{v}': {e}"),
        })?;
        Some((secs, Source::Environment))
    } else {
        settings.timeout_secs.map(|v| (v, Source::SettingsFile))
    };

    let call_timeout = match timeout_secs {
        Some((0, source)) => {
            return Err(ConfigError::Invalid {
                setting: "timeout",
                source_name: source.label(),
                reason: "must be at least 1 second".into(),
            })
        }
        Some((secs, _)) => Duration::from_secs(secs),
        None => DEFAULT_CALL_TIMEOUT,
    };

    // TLS
    let (insecure_tls, insecure_source) = if overrides.insecure_tls {
        (true, Source::Flag)
    } else if let Some(v) = env_nonempty(INSECURE_ENV) {
        (parse_bool(&v)?, Source::Environment)
    } else if let Some(v) = settings.insecure_tls {
        (v, Source::SettingsFile)
    } else {
        (false, Source::Default)
    };

    Ok(ResolvedConfig {
        endpoint,
        endpoint_source,
        call_timeout,
        insecure_tls,
        insecure_source,
    })
}

fn parse_bool(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            setting: "insecure TLS flag",
            source_name: Source::Environment.label(),
            reason: format!("'{other}' is not a boolean"),
        }),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

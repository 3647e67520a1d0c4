pub mod commands;
pub mod config;
pub mod interpret;
pub mod mcp_client;
pub mod remediation;

use std::path::{Path, PathBuf};

/// Return the platform-standard data directory for the client.
///
/// - macOS: `~/Library/Application Support/openshift-mcp/`
/// - Windows: `{FOLDERID_RoamingAppData}\openshift-mcp\`
/// - Linux: `$XDG_DATA_HOME/openshift-mcp/` (fallback `~/.local/share/...`)
///
/// Falls back to `~/.openshift-mcp/` only if none of the above can be resolved.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = dirs::data_dir() {
        return dir.join("openshift-mcp");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".openshift-mcp")
}

/// Log file name inside the data directory.
pub const LOG_FILE: &str = "client.log";

/// Number of rotated log files kept next to the active one.
const LOG_KEEP: u32 = 3;

/// Logging options chosen on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    /// Mirror logs to stderr at debug level.
    pub verbose: bool,
    /// Write the log file as JSON lines.
    pub json: bool,
}

/// Initialize the tracing subscriber.
///
/// On each start:
/// 1. Rotates existing logs (client.log → client.log.1 → .2 → .3, keeps last 3).
/// 2. Opens a fresh client.log with a line-flushing writer.
/// 3. With `verbose`, also mirrors every event to stderr.
///
/// Returns the log file path, or `None` when the data directory is not
/// writable; logging then goes to stderr only if `verbose` is set.
pub fn init_tracing(options: LogOptions) -> Option<PathBuf> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = if options.verbose {
        "openshift_mcp_client=debug,warn"
    } else {
        "openshift_mcp_client=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let log_dir = data_dir();
    let log_path = log_dir.join(LOG_FILE);
    let log_file = std::fs::create_dir_all(&log_dir).ok().and_then(|()| {
        rotate_log_file(&log_path, LOG_KEEP);
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .ok()
    });
    let opened = log_file.is_some();

    let (plain_file, json_file) = match log_file.map(FlushingWriter::new) {
        Some(writer) if options.json => (None, Some(writer)),
        Some(writer) => (Some(writer), None),
        None => (None, None),
    };

    let plain_layer = plain_file.map(|w| {
        fmt::layer()
            .with_writer(w)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
    });
    let json_layer = json_file.map(|w| fmt::layer().json().with_writer(w).with_target(true));
    let stderr_layer = options.verbose.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(plain_layer)
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if !installed || !opened {
        return None;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %log_dir.display(),
        log_file = %log_path.display(),
        pid = std::process::id(),
        "=== openshift-mcp starting ==="
    );
    Some(log_path)
}

/// Rotate log files: `client.log` → `client.log.1` → `.2` → … → `.{keep}`.
///
/// Oldest file beyond `keep` is deleted. Missing files in the chain are skipped.
fn rotate_log_file(base_path: &Path, keep: u32) {
    let oldest = format!("{}.{keep}", base_path.display());
    let _ = std::fs::remove_file(&oldest);

    // Shift: .{n-1} → .{n}
    for i in (1..keep).rev() {
        let from = format!("{}.{i}", base_path.display());
        let to = format!("{}.{}", base_path.display(), i + 1);
        let _ = std::fs::rename(&from, &to);
    }

    if base_path.exists() {
        let to = format!("{}.1", base_path.display());
        let _ = std::fs::rename(base_path, &to);
    }
}

/// A writer that wraps `std::fs::File` and flushes after every write.
///
/// The process usually exits right after a command finishes; each log line
/// must already be on disk by then.
#[derive(Clone)]
struct FlushingWriter {
    file: std::sync::Arc<std::sync::Mutex<std::fs::File>>,
}

impl FlushingWriter {
    fn new(file: std::fs::File) -> Self {
        Self {
            file: std::sync::Arc::new(std::sync::Mutex::new(file)),
        }
    }
}

impl std::io::Write for FlushingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut f = self
            .file
            .lock()
            .map_err(|e| std::io::Error::other(format!("lock poisoned: {e}")))?;
        let n = std::io::Write::write(&mut *f, buf)?;
        std::io::Write::flush(&mut *f)?;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut f = self
            .file
            .lock()
            .map_err(|e| std::io::Error::other(format!("lock poisoned: {e}")))?;
        std::io::Write::flush(&mut *f)
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for FlushingWriter {
    type Writer = FlushingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

//! `openshift-mcp`: command-line client for the OpenShift MCP server.

use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use openshift_mcp_client::commands::{self, build::BuildRequest, deploy::DeployRequest};
use openshift_mcp_client::config::{self, Overrides, ResolvedConfig};
use openshift_mcp_client::mcp_client::{McpClient, McpError};
use openshift_mcp_client::{init_tracing, LogOptions};

#[derive(Parser)]
#[command(name = "openshift-mcp")]
#[command(about = "Invoke OpenShift MCP server tools and interpret their results")]
#[command(version)]
struct Cli {
    /// Server endpoint URL (overrides OPENSHIFT_MCP_ENDPOINT and the settings file)
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    /// Round-trip timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Accept invalid or self-signed TLS certificates
    #[arg(long, global = true)]
    insecure: bool,

    /// Mirror debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write the log file as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the server's tools grouped by family
    Tools,

    /// Build a container image with UBI compliance validation
    Build {
        /// Git URL, local directory or archive URL
        source: String,
        /// Target image name, e.g. quay.io/acme/web:1.0
        image: String,
        /// Dockerfile path relative to the build context
        #[arg(long)]
        dockerfile: Option<String>,
        /// Git branch to check out
        #[arg(long)]
        branch: Option<String>,
        /// Do not ask the server to validate UBI compliance
        #[arg(long)]
        skip_ubi_validation: bool,
        /// Do not ask the server to scan the Dockerfile
        #[arg(long)]
        skip_security_scan: bool,
    },

    /// Deploy a Git repository to a namespace
    Deploy {
        /// Git repository URL
        repo_url: String,
        /// Target namespace
        namespace: String,
        /// Application name (defaults to the repository name)
        #[arg(long)]
        name: Option<String>,
        /// Git branch to deploy
        #[arg(long)]
        branch: Option<String>,
        /// Application port
        #[arg(long)]
        port: Option<u16>,
    },

    /// List pods, optionally in one namespace
    Pods {
        namespace: Option<String>,
    },

    /// Invoke any tool with ad hoc arguments
    Call {
        /// Tool name as listed by `tools`
        tool: String,
        /// Argument as key=value (repeatable)
        #[arg(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,
        /// Base argument object as JSON
        #[arg(long, value_name = "OBJECT")]
        json: Option<String>,
    },

    /// Write a Dockerfile.ubi scaffold for a suggested base image
    Remediate {
        /// Suggested UBI base image
        image: String,
        /// Directory to write into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Replace an existing scaffold without asking
        #[arg(long)]
        force: bool,
    },

    /// Inspect or change persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective settings and their sources
    Show,
    /// Persist the server endpoint
    SetEndpoint { url: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_file = init_tracing(LogOptions {
        verbose: cli.verbose,
        json: cli.log_json,
    });
    if let Some(notice) = logging_notice(log_file.as_deref(), cli.verbose) {
        eprintln!("{notice}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {}", render_error(&e));
            ExitCode::FAILURE
        }
    }
}

/// Stderr notice when no log file could be opened. Verbose runs already log
/// to stderr.
fn logging_notice(log_file: Option<&Path>, verbose: bool) -> Option<String> {
    if log_file.is_some() || verbose {
        return None;
    }
    Some(format!(
        "warning: cannot write logs under {}; continuing without a log file",
        openshift_mcp_client::data_dir().display()
    ))
}

fn render_error(e: &anyhow::Error) -> String {
    match e.downcast_ref::<McpError>() {
        Some(mcp) => mcp.user_message(),
        None => format!("{e:#}"),
    }
}

impl Command {
    /// Commands that never contact the server and must keep working when the
    /// stored settings are broken.
    fn is_offline(&self) -> bool {
        matches!(
            self,
            Command::Remediate { .. }
                | Command::Config {
                    action: ConfigAction::SetEndpoint { .. }
                }
        )
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings_path = config::settings_path();

    if cli.command.is_offline() {
        return run_offline(cli.command, &settings_path);
    }

    let settings = config::load_settings(&settings_path)?;
    let resolved = config::resolve(
        &Overrides {
            endpoint: cli.endpoint,
            timeout_secs: cli.timeout,
            insecure_tls: cli.insecure,
        },
        &settings,
    )?;

    match cli.command {
        Command::Tools => {
            let client = connect(&resolved)?;
            print!("{}", commands::tools::list_tools(&client).await?);
        }
        Command::Build {
            source,
            image,
            dockerfile,
            branch,
            skip_ubi_validation,
            skip_security_scan,
        } => {
            let client = connect(&resolved)?;
            let mut request = BuildRequest::new(source, image);
            request.dockerfile = dockerfile;
            request.git_branch = branch;
            request.validate_ubi = !skip_ubi_validation;
            request.security_scan = !skip_security_scan;
            print!("{}", commands::build::build(&client, &request).await?);
        }
        Command::Deploy {
            repo_url,
            namespace,
            name,
            branch,
            port,
        } => {
            let client = connect(&resolved)?;
            let mut request = DeployRequest::new(repo_url, namespace);
            request.app_name = name;
            request.branch = branch;
            request.port = port;
            print!("{}", commands::deploy::deploy(&client, &request).await?);
        }
        Command::Pods { namespace } => {
            let client = connect(&resolved)?;
            print!(
                "{}",
                commands::pods::list_pods(&client, namespace.as_deref()).await?
            );
        }
        Command::Call { tool, args, json } => {
            let arguments = commands::call::build_arguments(json.as_deref(), &args)?;
            let client = connect(&resolved)?;
            print!("{}", commands::call::call(&client, &tool, arguments).await?);
        }
        Command::Config {
            action: ConfigAction::Show,
        } => {
            print!("{}", commands::settings::show(&settings_path, &resolved));
        }
        command @ (Command::Remediate { .. }
        | Command::Config {
            action: ConfigAction::SetEndpoint { .. },
        }) => return run_offline(command, &settings_path),
    }

    Ok(())
}

/// Commands that run without loading or resolving the stored settings.
fn run_offline(command: Command, settings_path: &Path) -> Result<()> {
    match command {
        Command::Remediate { image, dir, force } => {
            let report = commands::remediate::remediate(&image, &dir, |path| {
                force || confirm_overwrite(path)
            })?;
            print!("{report}");
        }
        Command::Config {
            action: ConfigAction::SetEndpoint { url },
        } => {
            let endpoint = commands::settings::set_endpoint(settings_path, &url)
                .with_context(|| {
                    format!("could not save endpoint to {}", settings_path.display())
                })?;
            println!("Endpoint set to {endpoint}");
        }
        _ => anyhow::bail!("command needs a server connection"),
    }
    Ok(())
}

/// Build a client from resolved settings, warning on stderr when TLS
/// verification is off.
fn connect(resolved: &ResolvedConfig) -> Result<McpClient> {
    if resolved.insecure_tls {
        eprintln!(
            "warning: TLS certificate verification is disabled for {}",
            resolved.endpoint
        );
    }
    Ok(McpClient::new(
        resolved.endpoint.clone(),
        resolved.client_options(),
    )?)
}

/// Ask on the terminal before replacing a file. Non-interactive runs decline.
fn confirm_overwrite(path: &Path) -> bool {
    if !std::io::stdin().is_terminal() {
        return false;
    }
    eprint!("{} already exists. Overwrite? [y/N] ", path.display());
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

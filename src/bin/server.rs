//! WebIntel MCP server
//!
//! Serves the web intelligence tools over Streamable HTTP (default), SSE or stdio.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use webintel::config::{
    apply_env_overrides, load_config_file, load_config_from_path, validate_config, Config,
    LogConfig, Transport,
};
use webintel::mcp::{serve, McpHandler};
use webintel::tools::default_registry;
use webintel::VERSION;

#[derive(Parser)]
#[command(
    name = "webintel-mcp",
    author = "WebIntel Contributors",
    version = VERSION,
    about = "WebIntel MCP - search, fetch, YouTube transcripts and Reddit for AI assistants",
    long_about = None
)]
struct Args {
    /// Port to listen on (overrides MCP_PORT)
    #[arg(long, short)]
    port: Option<u16>,

    /// Bind address (overrides MCP_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Use the Streamable HTTP transport
    #[arg(long, conflicts_with_all = ["sse", "stdio"])]
    http: bool,

    /// Use the legacy SSE transport
    #[arg(long, conflicts_with = "stdio")]
    sse: bool,

    /// Use the stdio transport
    #[arg(long)]
    stdio: bool,

    /// Config file (JSON5 or TOML)
    #[arg(long, short, env = "WEBINTEL_CONFIG")]
    config: Option<PathBuf>,

    /// Validate the configuration and exit
    #[arg(long)]
    check_config: bool,
}

impl Args {
    /// CLI flags take precedence over file and environment
    fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if self.http {
            config.server.transport = Transport::Http;
        } else if self.sse {
            config.server.transport = Transport::Sse;
        } else if self.stdio {
            config.server.transport = Transport::Stdio;
        }
    }
}

/// `RUST_LOG` and `LOG_FORMAT` win over the file; read here so logging is up
/// before the remaining environment overrides are applied and reported
fn log_settings(mut log: LogConfig) -> LogConfig {
    if let Some(level) = std::env::var("RUST_LOG").ok().filter(|v| !v.trim().is_empty()) {
        log.level = level;
    }
    if let Some(format) = std::env::var("LOG_FORMAT").ok().filter(|v| !v.trim().is_empty()) {
        log.format = format;
    }
    log
}

/// Logs go to stderr so stdout stays clean for the stdio transport
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_new(&log.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let writer = BoxMakeWriter::new(std::io::stderr);

    if log.format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(writer)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let mut config = match args.config.as_deref() {
        Some(path) => load_config_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => load_config_file()?,
    };

    init_tracing(&log_settings(config.log.clone()));

    apply_env_overrides(&mut config);
    args.apply(&mut config);

    let validation = validate_config(&config);
    for issue in &validation.warnings {
        warn!("{}", issue);
    }
    for issue in &validation.errors {
        error!("{}", issue);
    }

    if args.check_config {
        if !validation.valid {
            bail!("configuration has {} error(s)", validation.errors.len());
        }
        info!("Configuration OK");
        return Ok(());
    }

    info!(
        "Starting WebIntel MCP v{} ({} transport)",
        VERSION, config.server.transport
    );

    let registry = default_registry(&config).context("building tools")?;
    info!("Registered tools: {}", registry.names().join(", "));

    serve(McpHandler::new(registry), &config.server).await?;

    Ok(())
}

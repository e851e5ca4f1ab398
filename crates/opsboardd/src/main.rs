//! opsboardd - opsboard daemon
//!
//! Serves health snapshots of an autonomous agent, derived from its log files.
//!
//! Usage:
//!   opsboardd [OPTIONS] [config.toml]
//!
//! Options:
//!   --json-logs   Emit the daemon's own logs as JSON
//!
//! Without a config file the daemon reads `$HOME/.openclaw/logs`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use opsboard_api::{create_router, AppState};
use opsboard_core::LogSource;
use opsboard_fleet::SummaryComposer;
use opsboard_sources::{LocalLogSource, MockLogSource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{DaemonConfig, LogFormat, Mode};

const DEFAULT_FILTER: &str = "opsboardd=info,opsboard_api=info,opsboard_fleet=info,opsboard_sources=info";

/// Parsed command-line arguments
struct Args {
    /// Daemon config file (TOML)
    config_path: Option<String>,
    json_logs: bool,
}

fn parse_args() -> Args {
    let mut result = Args {
        config_path: None,
        json_logs: false,
    };

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json-logs" => result.json_logs = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                // Positional argument = config file
                result.config_path = Some(arg.to_string());
            }
            _ => eprintln!("Unknown argument: {}", arg),
        }
    }

    result
}

fn print_help() {
    eprintln!(
        r#"opsboardd - opsboard daemon

Usage: opsboardd [OPTIONS] [config.toml]

Options:
      --json-logs   Emit the daemon's own logs as JSON
  -h, --help        Print this help message

Environment:
  OPSBOARD_LOGS_DIR   Log directory (default: $HOME/.openclaw/logs)
  OPSBOARD_MODE       local | mock
  OPSBOARD_PORT       Listen port (default: 3000)
  OPSBOARD_HOST       Listen address (default: 0.0.0.0)
  RUST_LOG            Log filter

Examples:
  # Serve the default log directory
  opsboardd

  # Serve canned demo data
  OPSBOARD_MODE=mock opsboardd

  # Run with config file
  opsboardd opsboard.toml
"#
    );
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn build_source(config: &DaemonConfig) -> Arc<dyn LogSource> {
    match config.logs.mode {
        Mode::Mock => {
            tracing::info!("Serving demo logs (mock mode)");
            Arc::new(MockLogSource::demo())
        }
        Mode::Local => {
            let dir = config.logs.resolved_directory();
            tracing::info!(directory = %dir.display(), "Reading local logs");
            Arc::new(LocalLogSource::new(dir).with_read_timeout(config.logs.read_timeout()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args();

    let mut config = match args.config_path {
        Some(ref path) => DaemonConfig::load(path)?,
        None => DaemonConfig::default(),
    };
    config.apply_env_overrides()?;
    config.validate()?;
    if args.json_logs {
        config.logs.log_format = LogFormat::Json;
    }

    init_tracing(config.logs.log_format);
    tracing::info!("Starting opsboardd");
    if let Some(ref path) = args.config_path {
        tracing::info!("Loaded config from: {}", path);
    }

    let source = build_source(&config);
    if !source.is_available().await {
        tracing::warn!(
            location = %source.location(),
            "Log storage not found, serving fallback snapshots until it appears"
        );
    }

    let composer = SummaryComposer::new(source).with_gateway_source(&config.logs.gateway_source);
    let app = create_router(AppState::new(composer));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Status endpoint: http://{}{}", addr, opsboard_api::STATUS_PATH);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

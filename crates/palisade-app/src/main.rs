//! Palisade - request-inspection gateway.
//!
//! Runs the HTTP gateway in front of the backend catalogue service:
//! inbound requests are classified for embedded secrets and prompt
//! injection, outbound responses are redacted.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use directories::ProjectDirs;
use palisade_server::{Server, ServerConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_UPSTREAM};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Palisade - request-inspection gateway
#[derive(Parser, Debug)]
#[command(name = "palisade", version, about)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind to
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Base URL of the proxied backend
    #[arg(long, default_value = DEFAULT_UPSTREAM)]
    upstream: String,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also write logs to a daily-rotated file
    #[arg(long)]
    log_to_file: bool,
}

/// Get the logs directory path.
fn logs_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "palisade", "Palisade").map(|dirs| dirs.data_dir().join("logs"))
}

/// Initialize logging: console always, optional daily-rotated file.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_level = if args.debug { "debug" } else { &args.log_level };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "palisade_core={level},palisade_server={level},palisade_app={level},warn",
            level = log_level
        ))
    });

    if args.log_to_file {
        if let Some(log_dir) = logs_dir() {
            if std::fs::create_dir_all(&log_dir).is_ok() {
                let file_appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .max_log_files(5)
                    .filename_prefix("palisade")
                    .filename_suffix("log")
                    .build(&log_dir)
                    .ok();

                if let Some(appender) = file_appender {
                    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(std::io::stdout))
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();

                    tracing::info!("Logging to {:?}", log_dir);
                    return Some(guard);
                }
            }
        }
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
        tracing::warn!("File logging unavailable, using console only");
        return None;
    }

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(&args);

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        upstream_url: args.upstream,
    };

    tracing::info!(
        upstream = %config.upstream_url,
        "Security features enabled: prompt injection detection, secret filtering, output sanitization"
    );

    let server = Server::new(config).context("failed to configure gateway")?;
    server.run().await.context("gateway exited with error")?;

    Ok(())
}

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use purled::{
    config::DaemonConfig, rest, session::SessionManager, upstream::UpstreamClient, AppContext,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "purled",
    about = "purled — backend daemon for the OBO config editors",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// REST API port
    #[arg(long, env = "PURLED_PORT")]
    port: Option<u16>,

    /// Data directory for the config file and logs
    #[arg(long, env = "PURLED_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PURLED_LOG")]
    log: Option<String>,

    /// Maximum concurrent editor sessions
    #[arg(long, env = "PURLED_MAX_SESSIONS")]
    max_sessions: Option<usize>,

    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "PURLED_BIND")]
    bind_address: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "PURLED_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the daemon server (default when no subcommand given).
    Serve,
    /// Print a built-in completion schema as JSON and exit.
    ///
    /// Examples:
    ///   purled schema purl
    ///   purled schema registry
    Schema {
        #[arg(value_enum)]
        editor_type: SchemaKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    Registry,
    Purl,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Command::Schema { editor_type }) => {
            let json = match editor_type {
                SchemaKind::Registry => purled::completion::schema::REGISTRY_SCHEMA_JSON,
                SchemaKind::Purl => purled::completion::schema::PURL_SCHEMA_JSON,
            };
            println!("{json}");
            Ok(())
        }
        Some(Command::Serve) | None => {
            let log_level = args.log.clone().unwrap_or_else(|| "info".to_string());
            let log_format = std::env::var("PURLED_LOG_FORMAT").unwrap_or_default();
            let _guard = setup_logging(&log_level, args.log_file.as_deref(), &log_format);
            run_server(
                args.port,
                args.data_dir,
                args.log,
                args.max_sessions,
                args.bind_address,
            )
            .await
        }
    }
}

async fn run_server(
    port: Option<u16>,
    data_dir: Option<std::path::PathBuf>,
    log: Option<String>,
    max_sessions: Option<usize>,
    bind_address: Option<String>,
) -> Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "purled starting");

    let config = Arc::new(DaemonConfig::new(port, data_dir, log, max_sessions, bind_address));
    info!(
        data_dir = %config.data_dir.display(),
        port = config.port,
        max_sessions = config.max_sessions,
        upstream_url = %config.upstream_url,
        "config loaded"
    );

    let sessions = Arc::new(SessionManager::new(config.max_sessions));
    let upstream = Arc::new(UpstreamClient::new(
        config.upstream_url.clone(),
        config.request_timeout,
    )?);

    let ctx = Arc::new(AppContext {
        config,
        sessions,
        upstream,
        started_at: Instant::now(),
    });

    rest::start_rest_server(ctx).await
}

fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("purled.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            // Fall back to stdout-only — don't panic on a bad log path.
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact())
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}

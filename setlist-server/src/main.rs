//! setlist-server - HTTP service for the lyrics setlist
//!
//! Serves the song store and the order store over HTTP, backed by a SQLite
//! key-value table in the root folder (or an in-memory store with
//! `--memory`).

use anyhow::{Context, Result};
use clap::Parser;
use setlist_common::config::{ConfigOverrides, ServerConfig};
use setlist_common::{KvStore, MemoryStore, Repository, SqliteStore};
use setlist_server::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Command-line arguments for setlist-server
#[derive(Parser, Debug)]
#[command(name = "setlist-server")]
#[command(about = "Lyrics setlist service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SETLIST_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long, env = "SETLIST_BIND")]
    bind: Option<String>,

    /// Root folder holding the database
    #[arg(short, long, env = "SETLIST_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Keep everything in memory; nothing survives a restart
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServerConfig::resolve(ConfigOverrides {
        config_file: args.config,
        root_folder: args.root_folder,
        bind_address: args.bind,
        port: args.port,
        log_level: args.log_level,
    })
    .context("Failed to load configuration")?;

    // Initialize tracing
    let level = &config.log_level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("setlist_server={level},setlist_common={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any database work
    info!(
        "Starting setlist-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Root folder: {}", config.root_folder.display());

    let store: Arc<dyn KvStore> = if args.memory {
        warn!("Using in-memory store; data is lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        info!("Database path: {}", config.database_path.display());
        Arc::new(
            SqliteStore::open(&config.database_path)
                .await
                .context("Failed to open database")?,
        )
    };

    let state = AppState::new(Repository::new(store));
    let app = build_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("setlist-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

//! chordlab-server - Chord checking and song library backend
//!
//! Serves chord classification for the practice keyboard and stores analyzed
//! songs in a local SQLite database with a JSON backup file.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chordlab_common::config::{resolve_root_folder, ServiceConfig, TomlConfig, ROOT_FOLDER_ENV};
use chordlab_common::db::init_database;
use chordlab_common::SongStore;
use chordlab_server::{build_router, AppState};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for chordlab-server
#[derive(Parser, Debug)]
#[command(name = "chordlab-server")]
#[command(about = "Chord checking and song library backend")]
#[command(version)]
struct Args {
    /// Folder holding the database and backup file
    #[arg(short, long, env = "CHORDLAB_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Port to listen on (defaults to config file, then 5001)
    #[arg(short, long, env = "CHORDLAB_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long, default_value = "0.0.0.0", env = "CHORDLAB_BIND")]
    bind: std::net::IpAddr,

    /// Backup file rewritten on export (relative paths resolve under the root folder)
    #[arg(long, env = "CHORDLAB_BACKUP_FILE")]
    backup_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "chordlab_server=info,chordlab_common=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification before anything that can stall
    info!(
        "Starting ChordLab server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    // CLI/env already folded into args by clap; the resolver adds TOML and OS default
    let toml_config = TomlConfig::load();
    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &toml_config);
    let config = ServiceConfig::new(
        root_folder,
        args.port.or(toml_config.port),
        args.backup_file.or(toml_config.backup_file),
    );
    config
        .ensure_root_folder()
        .with_context(|| format!("Failed to create root folder {}", config.root_folder.display()))?;

    info!("Root folder: {}", config.root_folder.display());
    info!("Backup file: {}", config.backup_path.display());

    let pool = match init_database(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(SongStore::new(pool, config.backup_path.clone()));
    let app = build_router(state);

    let addr = SocketAddr::new(args.bind, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("chordlab-server listening on http://{}", addr);

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
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

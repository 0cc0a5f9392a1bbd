//! Steadfast - tic-tac-toe server CLI
//!
//! Recovers the stored session, then serves it over HTTP.

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use steadfast_server::{
    BoardStatus, CommitUnit, ServerConfig, SessionManager, SqliteStore, Storage, build_router,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,steadfast_server=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };

    match cli.command {
        Command::Serve { host, port } => {
            let config = config.with_overrides(host, port, cli.database)?;
            serve(config).await
        }
        Command::Inspect => inspect(config.with_overrides(None, None, cli.database)?),
        Command::Reset => reset(config.with_overrides(None, None, cli.database)?),
    }
}

fn open_store(config: &ServerConfig) -> Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(config.database_path().clone())
        .with_context(|| format!("Opening database {}", config.database_path()))?;
    Ok(Arc::new(store))
}

/// Recover, then serve until the process is stopped.
#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
async fn serve(config: ServerConfig) -> Result<()> {
    let store = open_store(&config)?;
    let manager = SessionManager::recover(store, *config.broadcast_capacity())
        .context("Recovery failed; refusing to serve. Run `steadfast reset` to clear storage")?;
    info!(phase = %manager.status().phase(), "Session ready");

    let app = build_router(Arc::new(manager));
    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());

    axum::serve(listener, app).await?;
    Ok(())
}

/// Print the recovered session without serving.
fn inspect(config: ServerConfig) -> Result<()> {
    let store = open_store(&config)?;
    let manager = SessionManager::recover(store, *config.broadcast_capacity())?;
    let session = manager.status();
    println!("{}", serde_json::to_string_pretty(&BoardStatus::from(&session))?);
    println!("{}", session.board());
    Ok(())
}

/// Clear storage. Works even when recovery would fail.
fn reset(config: ServerConfig) -> Result<()> {
    let store = open_store(&config)?;
    warn!(path = %config.database_path(), "Clearing stored session");
    store.commit(&CommitUnit::Reset)?;
    info!("Storage cleared");
    Ok(())
}

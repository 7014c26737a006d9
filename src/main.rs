//! Booklib Server - book catalog REST API
//!
//! Loads configuration, opens the SQLite store and serves the book API until
//! SIGINT or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booklib_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::SqliteRepository,
    server, AppState,
};

#[derive(Debug, Parser)]
#[command(version, about = "Booklib book catalog server")]
struct Cli {
    /// Configuration file path, used when CONFIG_PATH is not set
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load(cli.config).context("Failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!(
        env = %config.env,
        "Starting Booklib Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let repository = SqliteRepository::connect(&config.storage)
        .await
        .with_context(|| format!("Failed to open storage at {}", config.storage.display()))?;

    tracing::info!(path = %config.storage.display(), "Storage initialized");

    let state = AppState::new(Arc::new(repository.clone()));
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.http_server.address)
        .await
        .with_context(|| format!("Failed to bind {}", config.http_server.address))?;

    tracing::info!(address = %config.http_server.address, "Server started");

    server::serve(listener, app, server::shutdown_signal()).await?;

    repository.close().await;
    Ok(())
}

/// Initialize tracing; `RUST_LOG` takes precedence over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("booklib_server={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

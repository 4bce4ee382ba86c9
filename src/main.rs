//! Star Wars REST API
//!
//! CRUD over users, characters, planets, vehicles and favorites, built with
//! Tokio and Axum on top of SQLite.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ ┌───────────────┐    ┌─────────┐    ┌───────────────┐
//!                      │  http server  │───▶│   api   │───▶│     store     │
//!                      │ (middleware)  │    │handlers │    │ sqlite/memory │
//!     ◀─────────────── └───────────────┘◀───└─────────┘◀───└───────────────┘
//!     Client Response
//!
//!     Cross-cutting: config · observability (logs, metrics) · lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;

use starwars_api::config::load_config;
use starwars_api::lifecycle::{self, Shutdown};
use starwars_api::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "starwars-api")]
#[command(about = "Star Wars REST API server", version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starwars-api starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = ?config.database.backend,
        database = %config.database.path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    lifecycle::start(config, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

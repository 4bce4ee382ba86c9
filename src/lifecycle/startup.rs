//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the configured store
//! - Start the metrics exporter when enabled
//! - Bind the listener and hand it to the HTTP server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::ApiConfig;
use crate::http::ApiServer;
use crate::observability::metrics;
use crate::store::{self, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Bring the service up and serve until shutdown.
pub async fn start(config: ApiConfig, shutdown: broadcast::Receiver<()>) -> Result<(), StartupError> {
    let store = store::open(&config.database)?;

    if config.observability.metrics_enabled {
        // validated at load time
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr)?;
        }
    }

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    ApiServer::new(&config, store)
        .run(listener, shutdown)
        .await
        .map_err(StartupError::Serve)
}

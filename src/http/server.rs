//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Render middleware rejections with the same JSON envelope as handlers
//! - Bind server to listener
//! - Stop cleanly on a shutdown broadcast or OS signal

use axum::{extract::Request, middleware, Router, ServiceExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::Layer;
use tower_http::{
    limit::RequestBodyLimitLayer,
    normalize_path::NormalizePathLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::config::ApiConfig;
use crate::http::error::envelope_layer_errors;
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::metrics;
use crate::store::Store;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

/// HTTP server for the API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Create a new HTTP server over the given store.
    pub fn new(config: &ApiConfig, store: Arc<dyn Store>) -> Self {
        Self {
            router: build_router(config, AppState::new(store)),
        }
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns once a shutdown broadcast or OS signal arrives and in-flight
    /// requests have drained.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        // Trailing slashes are trimmed before routing, so `/user/` hits `/user`.
        let app = NormalizePathLayer::trim_trailing_slash().layer(self.router);

        axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ApiConfig, state: AppState) -> Router {
    api::routes()
        .route_layer(middleware::from_fn(metrics::track_metrics))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(middleware::map_response(envelope_layer_errors))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id(request.headers()),
            )
        }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
}

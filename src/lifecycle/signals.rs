//! OS signal handling.
//!
//! SIGINT (Ctrl+C), SIGTERM on unix, or an internal broadcast all end the
//! graceful-shutdown wait of the server.

use tokio::sync::broadcast;

/// Resolve when the process should stop serving.
pub async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    // A dropped `Shutdown` handle means nobody can ask any more.
    let requested = async {
        if let Err(broadcast::error::RecvError::Closed) = shutdown.recv().await {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("Shutdown signal received"),
        _ = terminate => tracing::info!("SIGTERM received"),
        _ = requested => tracing::info!("Shutdown requested"),
    }
}

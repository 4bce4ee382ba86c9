//! Shutdown coordination.

use tokio::sync::broadcast;

/// Broadcast handle that stops the API server.
///
/// `main` hands a receiver to `ApiServer::run`; tests keep the handle and
/// call `trigger` to stop a server they spawned.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscriber to stop. A no-op once all have finished.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

//! Shared utilities for integration tests.

use std::sync::Arc;
use std::time::Duration;

use starwars_api::{ApiConfig, ApiServer, MemoryStore, Shutdown, SqliteStore, Store};
use tokio::net::TcpListener;

/// A server bound to an ephemeral port, stopped on drop.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the API over a private in-memory SQLite database.
pub async fn spawn_sqlite() -> TestServer {
    let store = SqliteStore::open_in_memory().unwrap();
    spawn_with(Arc::new(store)).await
}

/// Start the API over the process-local store.
#[allow(dead_code)]
pub async fn spawn_memory() -> TestServer {
    spawn_with(Arc::new(MemoryStore::new())).await
}

async fn spawn_with(store: Arc<dyn Store>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = ApiServer::new(&ApiConfig::default(), store);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    TestServer {
        base_url: format!("http://{addr}"),
        client,
        shutdown,
    }
}

//! Star Wars REST API Library

pub mod api;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod store;

pub use config::ApiConfig;
pub use http::{ApiServer, AppState};
pub use lifecycle::Shutdown;
pub use store::{MemoryStore, SqliteStore, Store};

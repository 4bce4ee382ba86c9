use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// One routable method/path pair.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Endpoint {
    pub method: &'static str,
    pub path: &'static str,
}

const fn endpoint(method: &'static str, path: &'static str) -> Endpoint {
    Endpoint { method, path }
}

/// Every route served by `api::routes`, in registration order.
pub const ENDPOINTS: &[Endpoint] = &[
    endpoint("GET", "/"),
    endpoint("GET", "/health"),
    endpoint("GET", "/user"),
    endpoint("POST", "/user"),
    endpoint("GET", "/user/{id}"),
    endpoint("PUT", "/user/{username}"),
    endpoint("DELETE", "/user/{username}"),
    endpoint("GET", "/planets"),
    endpoint("POST", "/planets"),
    endpoint("GET", "/planets/{id}"),
    endpoint("DELETE", "/planets/{id}"),
    endpoint("GET", "/vehicles"),
    endpoint("POST", "/vehicles"),
    endpoint("GET", "/vehicles/{id}"),
    endpoint("DELETE", "/vehicles/{id}"),
    endpoint("GET", "/characters"),
    endpoint("POST", "/characters"),
    endpoint("GET", "/characters/{id}"),
    endpoint("DELETE", "/characters/{id}"),
    endpoint("GET", "/favorites"),
    endpoint("POST", "/favorites"),
    endpoint("GET", "/favorites/{id}"),
    endpoint("DELETE", "/favorites/{id}"),
];

pub async fn sitemap() -> Json<Value> {
    Json(json!({ "endpoints": ENDPOINTS }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

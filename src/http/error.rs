//! The single error type returned by every handler.
//!
//! Built where the failure is detected and rendered exactly once, as
//! `{"message": ...}` with the carried status code.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::model::{Entity, RecordId};
use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP status plus client-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Generic 500; the cause is logged, never returned.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
    }

    pub fn missing_fields() -> Self {
        Self::bad_request("Missing fields")
    }

    /// 404 for an entity looked up by primary key.
    pub fn missing<E: Entity>(id: RecordId) -> Self {
        Self::not_found(format!("{} with id {id} not found", E::NAME))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

/// Re-render error responses produced outside the handlers.
///
/// Middleware such as the body limit and the timeout answer with an empty or
/// plain-text body; those become the `{"message": ...}` envelope. JSON bodies
/// already came from an `ApiError` and pass through.
pub async fn envelope_layer_errors(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }

    let message = status.canonical_reason().unwrap_or("Request failed");
    ApiError::new(status, message).into_response()
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::not_found(err.to_string()),
            StoreError::Referenced { .. } => Self::bad_request(err.to_string()),
            other => {
                tracing::error!(error = %other, "Store operation failed");
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
            other => other.status(),
        };
        Self::new(status, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vehicle;

    #[test]
    fn test_store_error_mapping() {
        let not_found = ApiError::from(StoreError::missing::<Vehicle>(9));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.message(), "Vehicle with id 9 not found");

        let referenced = ApiError::from(StoreError::referenced::<Vehicle>(9));
        assert_eq!(referenced.status(), StatusCode::BAD_REQUEST);

        let conflict = ApiError::from(StoreError::Constraint("UNIQUE constraint failed: vehicle.name".into()));
        assert_eq!(conflict, ApiError::internal());
        assert!(!conflict.message().contains("UNIQUE"));
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_layer_errors_get_envelope() {
        let timed_out = StatusCode::REQUEST_TIMEOUT.into_response();
        let response = envelope_layer_errors(timed_out).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body_json(response).await, json!({ "message": "Request Timeout" }));

        let too_large = (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response();
        let response = envelope_layer_errors(too_large).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await, json!({ "message": "Payload Too Large" }));
    }

    #[tokio::test]
    async fn test_handler_errors_pass_through() {
        let response = envelope_layer_errors(ApiError::missing::<Vehicle>(3).into_response()).await;
        assert_eq!(body_json(response).await, json!({ "message": "Vehicle with id 3 not found" }));

        let ok = envelope_layer_errors(StatusCode::ACCEPTED.into_response()).await;
        assert_eq!(ok.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_envelope() {
        let response = ApiError::missing_fields().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "message": "Missing fields" }));
    }
}

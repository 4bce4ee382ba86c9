//! Extractors whose rejections use the `ApiError` envelope.

use axum::extract::{FromRequest, FromRequestParts};

use crate::http::error::ApiError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Single path parameter.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathKey<T>(pub T);

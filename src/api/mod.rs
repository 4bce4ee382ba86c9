//! REST resources.
//!
//! # Routes
//! ```text
//! /                      sitemap
//! /health                liveness
//! /user[/{key}]          key is the id for GET, the username for PUT/DELETE
//! /planets[/{id}]
//! /vehicles[/{id}]
//! /characters[/{id}]
//! /favorites[/{id}]
//! ```
//!
//! # Design Decisions
//! - Handlers check field presence and map store results
//! - Referential-integrity guards run inside the store, atomically with the delete
//! - Every failure is an `ApiError`, rendered as `{"message": ...}`

pub mod characters;
pub mod favorites;
pub mod planets;
pub mod system;
pub mod users;
pub mod vehicles;

use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::Value;

use crate::http::{ApiError, AppState};
use crate::model::Entity;

/// All API routes, still awaiting state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(system::sitemap))
        .route("/health", get(system::health))
        .route("/user", get(users::list_users).post(users::create_user))
        .route(
            "/user/{key}",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        .route("/planets", get(planets::list_planets).post(planets::create_planet))
        .route("/planets/{id}", get(planets::get_planet).delete(planets::delete_planet))
        .route("/vehicles", get(vehicles::list_vehicles).post(vehicles::create_vehicle))
        .route("/vehicles/{id}", get(vehicles::get_vehicle).delete(vehicles::delete_vehicle))
        .route(
            "/characters",
            get(characters::list_characters).post(characters::create_character),
        )
        .route(
            "/characters/{id}",
            get(characters::get_character).delete(characters::delete_character),
        )
        .route("/favorites", get(favorites::list_favorites).post(favorites::create_favorite))
        .route("/favorites/{id}", get(favorites::get_favorite).delete(favorites::delete_favorite))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
}

pub(crate) fn serialize_all<E: Entity>(rows: &[E]) -> Json<Value> {
    Json(Value::Array(rows.iter().map(Entity::serialize).collect()))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::api::serialize_all;
use crate::http::{ApiError, ApiResult, AppState, JsonBody, PathKey};
use crate::model::{Character, Entity, NewCharacter, Planet, RecordId, Vehicle};

#[derive(Debug, Deserialize)]
pub struct CreateCharacter {
    pub name: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub planet_id: Option<RecordId>,
    pub vehicle_id: Option<RecordId>,
}

pub async fn list_characters(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(serialize_all(&state.store.list_characters()?))
}

pub async fn get_character(State(state): State<AppState>, PathKey(id): PathKey<RecordId>) -> ApiResult<Json<Value>> {
    let character = state
        .store
        .get_character(id)?
        .ok_or_else(|| ApiError::missing::<Character>(id))?;
    Ok(Json(character.serialize()))
}

/// Responds 200 rather than 201; existing clients depend on it.
pub async fn create_character(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateCharacter>,
) -> ApiResult<Json<Value>> {
    let (Some(name), Some(height), Some(weight), Some(planet_id), Some(vehicle_id)) =
        (body.name, body.height, body.weight, body.planet_id, body.vehicle_id)
    else {
        return Err(ApiError::missing_fields());
    };

    let planet = state
        .store
        .get_planet(planet_id)?
        .ok_or_else(|| ApiError::missing::<Planet>(planet_id))?;
    let vehicle = state
        .store
        .get_vehicle(vehicle_id)?
        .ok_or_else(|| ApiError::missing::<Vehicle>(vehicle_id))?;

    let character = state.store.insert_character(NewCharacter {
        name,
        height,
        weight,
        planet: planet.id,
        vehicle: vehicle.id,
    })?;
    tracing::info!(character_id = character.id, name = %character.name, "Character created");

    Ok(Json(character.serialize()))
}

pub async fn delete_character(
    State(state): State<AppState>,
    PathKey(id): PathKey<RecordId>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let character = state.store.delete_character(id)?;
    tracing::info!(character_id = id, "Character deleted");

    Ok((StatusCode::ACCEPTED, Json(character.serialize())))
}

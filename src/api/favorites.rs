use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::api::serialize_all;
use crate::http::{ApiError, ApiResult, AppState, JsonBody, PathKey};
use crate::model::{Character, Entity, Favorite, NewFavorite, Planet, RecordId, User, Vehicle};

#[derive(Debug, Deserialize)]
pub struct CreateFavorite {
    pub user_id: Option<RecordId>,
    pub character_id: Option<RecordId>,
    pub planet_id: Option<RecordId>,
    pub vehicle_id: Option<RecordId>,
}

pub async fn list_favorites(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(serialize_all(&state.store.list_favorites()?))
}

pub async fn get_favorite(State(state): State<AppState>, PathKey(id): PathKey<RecordId>) -> ApiResult<Json<Value>> {
    let favorite = state
        .store
        .get_favorite(id)?
        .ok_or_else(|| ApiError::missing::<Favorite>(id))?;
    Ok(Json(favorite.serialize()))
}

/// Every referenced row must exist; the first missing one is reported.
pub async fn create_favorite(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateFavorite>,
) -> ApiResult<Json<Value>> {
    let (Some(user_id), Some(character_id), Some(planet_id), Some(vehicle_id)) =
        (body.user_id, body.character_id, body.planet_id, body.vehicle_id)
    else {
        return Err(ApiError::missing_fields());
    };

    let store = &state.store;
    let user = store.get_user(user_id)?.ok_or_else(|| ApiError::missing::<User>(user_id))?;
    let character = store
        .get_character(character_id)?
        .ok_or_else(|| ApiError::missing::<Character>(character_id))?;
    let planet = store
        .get_planet(planet_id)?
        .ok_or_else(|| ApiError::missing::<Planet>(planet_id))?;
    let vehicle = store
        .get_vehicle(vehicle_id)?
        .ok_or_else(|| ApiError::missing::<Vehicle>(vehicle_id))?;

    let favorite = store.insert_favorite(NewFavorite {
        user: user.id,
        character: character.id,
        planet: planet.id,
        vehicle: vehicle.id,
    })?;
    tracing::info!(favorite_id = favorite.id, user_id = user.id, "Favorite created");

    Ok(Json(favorite.serialize()))
}

pub async fn delete_favorite(
    State(state): State<AppState>,
    PathKey(id): PathKey<RecordId>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let favorite = state.store.delete_favorite(id)?;
    tracing::info!(favorite_id = id, "Favorite deleted");

    Ok((StatusCode::ACCEPTED, Json(favorite.serialize())))
}

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::api::serialize_all;
use crate::http::{ApiError, ApiResult, AppState, JsonBody, PathKey};
use crate::model::{Entity, NewPlanet, Planet, RecordId};

#[derive(Debug, Deserialize)]
pub struct CreatePlanet {
    pub name: Option<String>,
    pub density: Option<f64>,
    pub diameter: Option<f64>,
    pub orbital_period: Option<i64>,
    pub population: Option<i64>,
    pub weather: Option<String>,
    /// Older clients spell it `weater`; `weather` wins when both are sent.
    pub weater: Option<String>,
}

impl CreatePlanet {
    fn into_new(self) -> Option<NewPlanet> {
        Some(NewPlanet {
            name: self.name?,
            density: self.density?,
            diameter: self.diameter?,
            orbital_period: self.orbital_period?,
            population: self.population?,
            weather: self.weather.or(self.weater)?,
        })
    }
}

pub async fn list_planets(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(serialize_all(&state.store.list_planets()?))
}

pub async fn get_planet(State(state): State<AppState>, PathKey(id): PathKey<RecordId>) -> ApiResult<Json<Value>> {
    let planet = state.store.get_planet(id)?.ok_or_else(|| ApiError::missing::<Planet>(id))?;
    Ok(Json(planet.serialize()))
}

pub async fn create_planet(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePlanet>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let new = body.into_new().ok_or_else(ApiError::missing_fields)?;

    let planet = state.store.insert_planet(new)?;
    tracing::info!(planet_id = planet.id, name = %planet.name, "Planet created");

    Ok((StatusCode::CREATED, Json(planet.serialize())))
}

pub async fn delete_planet(
    State(state): State<AppState>,
    PathKey(id): PathKey<RecordId>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let planet = state.store.delete_planet(id)?;
    tracing::info!(planet_id = id, "Planet deleted");

    Ok((StatusCode::ACCEPTED, Json(planet.serialize())))
}

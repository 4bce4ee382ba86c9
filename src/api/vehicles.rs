use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::api::serialize_all;
use crate::http::{ApiError, ApiResult, AppState, JsonBody, PathKey};
use crate::model::{Entity, NewVehicle, RecordId, Vehicle};

#[derive(Debug, Deserialize)]
pub struct CreateVehicle {
    pub name: Option<String>,
    pub cargo_capacity: Option<f64>,
    pub crew: Option<i64>,
    pub model: Option<String>,
    pub passengers: Option<i64>,
}

impl CreateVehicle {
    fn into_new(self) -> Option<NewVehicle> {
        Some(NewVehicle {
            name: self.name?,
            crew: self.crew?,
            model: self.model?,
            cargo_capacity: self.cargo_capacity?,
            passengers: self.passengers?,
        })
    }
}

pub async fn list_vehicles(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(serialize_all(&state.store.list_vehicles()?))
}

pub async fn get_vehicle(State(state): State<AppState>, PathKey(id): PathKey<RecordId>) -> ApiResult<Json<Value>> {
    let vehicle = state.store.get_vehicle(id)?.ok_or_else(|| ApiError::missing::<Vehicle>(id))?;
    Ok(Json(vehicle.serialize()))
}

pub async fn create_vehicle(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateVehicle>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let new = body.into_new().ok_or_else(ApiError::missing_fields)?;

    let vehicle = state.store.insert_vehicle(new)?;
    tracing::info!(vehicle_id = vehicle.id, name = %vehicle.name, "Vehicle created");

    Ok((StatusCode::CREATED, Json(vehicle.serialize())))
}

pub async fn delete_vehicle(
    State(state): State<AppState>,
    PathKey(id): PathKey<RecordId>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let vehicle = state.store.delete_vehicle(id)?;
    tracing::info!(vehicle_id = id, "Vehicle deleted");

    Ok((StatusCode::ACCEPTED, Json(vehicle.serialize())))
}

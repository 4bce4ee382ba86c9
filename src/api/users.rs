use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::serialize_all;
use crate::http::{ApiError, ApiResult, AppState, JsonBody, PathKey};
use crate::model::{Entity, NewUser, RecordId, User, UserChanges};

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub password: Option<String>,
}

fn find_by_username(state: &AppState, username: &str) -> ApiResult<User> {
    state
        .store
        .find_user_by_username(username)?
        .ok_or_else(|| ApiError::not_found(format!("User with username: {username} not found")))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(serialize_all(&state.store.list_users()?))
}

pub async fn get_user(State(state): State<AppState>, PathKey(id): PathKey<RecordId>) -> ApiResult<Json<Value>> {
    let user = state.store.get_user(id)?.ok_or_else(|| ApiError::missing::<User>(id))?;
    Ok(Json(user.serialize()))
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateUser>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let (Some(username), Some(email), Some(password)) = (body.username, body.email, body.password) else {
        return Err(ApiError::missing_fields());
    };

    let user = state.store.insert_user(NewUser::new(email, username, password))?;
    tracing::info!(user_id = user.id, username = %user.username, "User created");

    Ok((StatusCode::CREATED, Json(json!({ "msg": "success" }))))
}

pub async fn update_user(
    State(state): State<AppState>,
    PathKey(username): PathKey<String>,
    JsonBody(body): JsonBody<UpdateUser>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = find_by_username(&state, &username)?;
    let changes = UserChanges {
        username: body.username,
        password: body.password,
    };
    if changes.is_empty() {
        tracing::debug!(user_id = user.id, "Update without changes");
    }

    let user = state.store.update_user(user.id, &changes)?;
    tracing::info!(user_id = user.id, "User updated");

    Ok((StatusCode::ACCEPTED, Json(user.serialize())))
}

pub async fn delete_user(
    State(state): State<AppState>,
    PathKey(username): PathKey<String>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = find_by_username(&state, &username)?;
    let user = state.store.delete_user(user.id)?;
    tracing::info!(user_id = user.id, "User deleted");

    Ok((StatusCode::ACCEPTED, Json(user.serialize())))
}

mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{spawn_memory, spawn_sqlite, TestServer};

async fn post(server: &TestServer, path: &str, body: Value) -> (StatusCode, Value) {
    let res = server.client.post(server.url(path)).json(&body).send().await.unwrap();
    (res.status(), res.json().await.unwrap())
}

async fn get(server: &TestServer, path: &str) -> (StatusCode, Value) {
    let res = server.client.get(server.url(path)).send().await.unwrap();
    (res.status(), res.json().await.unwrap())
}

async fn delete(server: &TestServer, path: &str) -> (StatusCode, Value) {
    let res = server.client.delete(server.url(path)).send().await.unwrap();
    (res.status(), res.json().await.unwrap())
}

async fn seed_planet(server: &TestServer, name: &str) -> i64 {
    let (status, planet) = post(
        server,
        "/planets",
        json!({
            "name": name,
            "density": 5.5,
            "diameter": 12240.0,
            "orbital_period": 368,
            "population": 1000000000,
            "weather": "cold",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    planet["id"].as_i64().unwrap()
}

async fn seed_vehicle(server: &TestServer) -> i64 {
    let (status, vehicle) = post(
        server,
        "/vehicles",
        json!({
            "name": "Snowspeeder",
            "cargo_capacity": 10.0,
            "crew": 2,
            "model": "t-47",
            "passengers": 0,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    vehicle["id"].as_i64().unwrap()
}

async fn seed_character(server: &TestServer, planet_id: i64, vehicle_id: i64) -> i64 {
    let (status, character) = post(
        server,
        "/characters",
        json!({
            "name": "Wedge Antilles",
            "height": 170.0,
            "weight": 77.0,
            "planet_id": planet_id,
            "vehicle_id": vehicle_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    character["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_duplicate_user_is_rejected() {
    let server = spawn_sqlite().await;
    let leia = json!({ "username": "leia", "email": "leia@alderaan.gov", "password": "hope" });

    let (status, _) = post(&server, "/user", leia.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&server, "/user", leia).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Something went wrong" }));

    let (_, users) = get(&server, "/user").await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_planet_roundtrip() {
    let server = spawn_sqlite().await;
    let id = seed_planet(&server, "Hoth").await;

    let (status, planet) = get(&server, &format!("/planets/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        planet,
        json!({
            "id": id,
            "name": "Hoth",
            "density": 5.5,
            "diameter": 12240.0,
            "orbital_period": 368,
            "population": 1000000000,
            "weather": "cold",
        })
    );
}

#[tokio::test]
async fn test_referenced_planet_survives_delete() {
    let server = spawn_sqlite().await;
    let planet_id = seed_planet(&server, "Corellia").await;
    let vehicle_id = seed_vehicle(&server).await;
    seed_character(&server, planet_id, vehicle_id).await;

    let (status, body) = delete(&server, &format!("/planets/{planet_id}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _) = get(&server, &format!("/planets/{planet_id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unreferenced_planet_is_deleted() {
    let server = spawn_sqlite().await;
    let id = seed_planet(&server, "Dagobah").await;

    let (status, body) = delete(&server, &format!("/planets/{id}")).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["name"], "Dagobah");

    let (status, _) = get(&server, &format!("/planets/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_password_keeps_username() {
    let server = spawn_sqlite().await;
    post(
        &server,
        "/user",
        json!({ "username": "lando", "email": "lando@bespin.cc", "password": "cape" }),
    )
    .await;

    let res = server
        .client
        .put(server.url("/user/lando"))
        .json(&json!({ "password": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["username"], "lando");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_favorite_with_missing_vehicle() {
    let server = spawn_sqlite().await;
    post(
        &server,
        "/user",
        json!({ "username": "wedge", "email": "wedge@rogue.sq", "password": "red2" }),
    )
    .await;
    let planet_id = seed_planet(&server, "Corellia").await;
    let vehicle_id = seed_vehicle(&server).await;
    let character_id = seed_character(&server, planet_id, vehicle_id).await;

    let (status, body) = post(
        &server,
        "/favorites",
        json!({
            "user_id": 1,
            "character_id": character_id,
            "planet_id": planet_id,
            "vehicle_id": vehicle_id + 100,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        format!("Vehicle with id {} not found", vehicle_id + 100)
    );

    let (_, favorites) = get(&server, "/favorites").await;
    assert_eq!(favorites, json!([]));
}

#[tokio::test]
async fn test_user_delete_cascades_to_favorites() {
    let server = spawn_sqlite().await;
    post(
        &server,
        "/user",
        json!({ "username": "biggs", "email": "biggs@rogue.sq", "password": "red3" }),
    )
    .await;
    let planet_id = seed_planet(&server, "Tatooine").await;
    let vehicle_id = seed_vehicle(&server).await;
    let character_id = seed_character(&server, planet_id, vehicle_id).await;

    let (status, _) = post(
        &server,
        "/favorites",
        json!({
            "user_id": 1,
            "character_id": character_id,
            "planet_id": planet_id,
            "vehicle_id": vehicle_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = delete(&server, &format!("/characters/{character_id}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, user) = delete(&server, "/user/biggs").await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(user["username"], "biggs");

    let (_, favorites) = get(&server, "/favorites").await;
    assert_eq!(favorites, json!([]));

    let (status, _) = delete(&server, &format!("/characters/{character_id}")).await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_list_is_idempotent() {
    let server = spawn_memory().await;
    seed_planet(&server, "Naboo").await;
    seed_planet(&server, "Kamino").await;

    let (_, first) = get(&server, "/planets").await;
    let (_, second) = get(&server, "/planets").await;
    assert_eq!(first, second);
    assert_eq!(first[0]["name"], "Naboo");
    assert_eq!(first[1]["name"], "Kamino");
}

#[tokio::test]
async fn test_trailing_slash_is_ignored() {
    let server = spawn_memory().await;

    let (status, body) = get(&server, "/user/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_invalid_json_uses_envelope() {
    let server = spawn_memory().await;

    let res = server
        .client
        .post(server.url("/planets"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let server = spawn_memory().await;

    let res = server.client.get(server.url("/health")).send().await.unwrap();
    let generated = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(generated.len(), 36);

    let res = server
        .client
        .get(server.url("/health"))
        .header("x-request-id", "rebel-base-7")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "rebel-base-7");
}

#[tokio::test]
async fn test_wrong_method_uses_envelope() {
    let server = spawn_sqlite().await;

    let res = server.client.put(server.url("/planets/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Method not allowed" }));
}

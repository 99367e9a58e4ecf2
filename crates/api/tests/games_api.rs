//! Integration tests for the games schedule.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, get_authed, send_json, seed_user, token_for};
use sqlx::PgPool;
use touchline_core::status::Role;

fn game_payload() -> serde_json::Value {
    serde_json::json!({
        "game_date": "2026-04-18",
        "game_time": "15:00:00",
        "opponent": "Riverside Rovers",
        "location": "Memorial Park Field 2",
        "team_group": "U12",
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn schedule_crud_roundtrip(pool: PgPool) {
    let admin = seed_user(&pool, "admin1", Role::Admin).await;
    let parent = seed_user(&pool, "parent1", Role::Parent).await;
    let app = build_test_app(pool);
    let admin_token = token_for(&admin);

    // Schedule.
    let response = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/games",
        Some(&admin_token),
        &game_payload(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let game_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["opponent"], "Riverside Rovers");

    // Any authenticated user sees the fixture list.
    let response = get_authed(app.clone(), "/api/v1/games", &token_for(&parent)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // Edit.
    let response = send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/games/{game_id}"),
        Some(&admin_token),
        &serde_json::json!({ "location": "Memorial Park Field 1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["location"], "Memorial Park Field 1");
    assert_eq!(json["data"]["opponent"], "Riverside Rovers");

    // Delete.
    let response = send_json(
        app.clone(),
        Method::DELETE,
        &format!("/api/v1/games/{game_id}"),
        Some(&admin_token),
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_authed(app, "/api/v1/games", &admin_token).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn scheduling_requires_admin(pool: PgPool) {
    let coach = seed_user(&pool, "coach1", Role::Coach).await;
    let app = build_test_app(pool);

    let response = send_json(
        app,
        Method::POST,
        "/api/v1/games",
        Some(&token_for(&coach)),
        &game_payload(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn team_group_must_be_a_known_bracket_or_all(pool: PgPool) {
    let admin = seed_user(&pool, "admin1", Role::Admin).await;
    let app = build_test_app(pool);
    let admin_token = token_for(&admin);

    let mut payload = game_payload();
    payload["team_group"] = serde_json::json!("U99");
    let response = send_json(app.clone(), Method::POST, "/api/v1/games", Some(&admin_token), &payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut payload = game_payload();
    payload["team_group"] = serde_json::json!("All");
    let response = send_json(app, Method::POST, "/api/v1/games", Some(&admin_token), &payload).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

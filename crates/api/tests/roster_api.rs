//! Integration tests for roster management and the coach directory.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, build_test_app, completed_event, get_authed, post_webhook, send_json,
    seed_pending_registration, seed_user, sign_webhook, token_for,
};
use sqlx::PgPool;
use touchline_core::status::Role;
use touchline_db::repositories::{PlayerRepo, UserRepo};

/// Settle a seeded registration so a player exists to operate on.
async fn seed_player(pool: &PgPool) -> touchline_db::models::player::Player {
    let registration = seed_pending_registration(pool).await;
    let app = build_test_app(pool.clone());
    let payload = completed_event("evt_seed", &registration.id.to_string(), "sub_seed");
    let signature = sign_webhook(&payload);
    let response = post_webhook(app, payload, Some(&signature)).await;
    assert_eq!(response.status(), StatusCode::OK);

    PlayerRepo::list_by_source_registration(pool, registration.id)
        .await
        .unwrap()
        .into_iter()
        .next()
        .expect("settlement must have created a player")
}

#[sqlx::test(migrations = "../db/migrations")]
async fn roster_listing_requires_a_staff_role(pool: PgPool) {
    let parent = seed_user(&pool, "parent1", Role::Parent).await;
    let coach = seed_user(&pool, "coach1", Role::Coach).await;
    let app = build_test_app(pool);

    let response = get_authed(app.clone(), "/api/v1/players", &token_for(&parent)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_authed(app, "/api/v1/players", &token_for(&coach)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn roster_edit_and_coach_reassignment(pool: PgPool) {
    let admin = seed_user(&pool, "admin1", Role::Admin).await;
    let coach = seed_user(&pool, "coach1", Role::Coach).await;
    let player = seed_player(&pool).await;
    let app = build_test_app(pool.clone());

    // Edit jersey and team.
    let response = send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/players/{}", player.id),
        Some(&token_for(&admin)),
        &serde_json::json!({
            "jersey_number": "10",
            "team_assigned": "Red Hawks",
            "position": "Midfielder",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["jersey_number"], "10");
    assert_eq!(json["data"]["team_assigned"], "Red Hawks");
    assert_eq!(json["data"]["position"], "Midfielder");

    // Values outside the closed sets are rejected.
    let response = send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/players/{}", player.id),
        Some(&token_for(&admin)),
        &serde_json::json!({ "position": "Sweeper" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Assign the coach; they now see the player under /players/mine.
    let response = send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/players/{}/coach", player.id),
        Some(&token_for(&admin)),
        &serde_json::json!({ "coach_id": coach.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_authed(app, "/api/v1/players/mine", &token_for(&coach)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["full_name"], "Ama Owusu");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn promotion_adds_the_user_to_the_coach_directory(pool: PgPool) {
    let admin = seed_user(&pool, "admin1", Role::Admin).await;
    let parent = seed_user(&pool, "parent1", Role::Parent).await;
    let app = build_test_app(pool.clone());

    let response = send_json(
        app.clone(),
        Method::POST,
        &format!("/api/v1/coaches/{}/promote", parent.id),
        Some(&token_for(&admin)),
        &serde_json::json!({ "bio": "U10 head coach" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Role updated...
    let user = UserRepo::find_by_id(&pool, parent.id).await.unwrap().unwrap();
    assert_eq!(user.role, "coach");

    // ...and the directory lists them.
    let response = get_authed(app, "/api/v1/coaches", &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let coaches = json["data"].as_array().unwrap();
    assert_eq!(coaches.len(), 1);
    assert_eq!(coaches[0]["user_id"], parent.id);
    assert_eq!(coaches[0]["bio"], "U10 head coach");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn promoting_an_admin_conflicts(pool: PgPool) {
    let admin = seed_user(&pool, "admin1", Role::Admin).await;
    let other_admin = seed_user(&pool, "admin2", Role::Admin).await;
    let app = build_test_app(pool);

    let response = send_json(
        app,
        Method::POST,
        &format!("/api/v1/coaches/{}/promote", other_admin.id),
        Some(&token_for(&admin)),
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn promotion_requires_admin(pool: PgPool) {
    let coach = seed_user(&pool, "coach1", Role::Coach).await;
    let parent = seed_user(&pool, "parent1", Role::Parent).await;
    let app = build_test_app(pool);

    let response = send_json(
        app,
        Method::POST,
        &format!("/api/v1/coaches/{}/promote", parent.id),
        Some(&token_for(&coach)),
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

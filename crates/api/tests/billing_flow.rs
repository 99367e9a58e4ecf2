//! Integration tests for the registration-to-payment-to-settlement workflow.
//!
//! Covers the checkout-session endpoint, the settlement webhook, replay
//! semantics in both dedupe modes, and the signature contract.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    ama_submission, body_json, body_text, build_test_app, build_test_app_with, completed_event,
    post_json, post_webhook, seed_pending_registration, sign_webhook, sign_webhook_with,
    test_config, FailingBilling, MockBilling, MOCK_CHECKOUT_URL,
};
use sqlx::PgPool;
use touchline_db::repositories::{PlayerRepo, RegistrationRepo};

// ---------------------------------------------------------------------------
// Checkout-session creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn submitting_intake_creates_one_pending_registration(pool: PgPool) {
    let app = build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/billing/checkout-session",
        &serde_json::json!({ "registrationData": ama_submission() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["url"], MOCK_CHECKOUT_URL);

    assert_eq!(RegistrationRepo::count(&pool).await.unwrap(), 1);

    let rows = RegistrationRepo::list(&pool, 10, 0).await.unwrap();
    let row = &rows[0];
    assert_eq!(row.first_name, "Ama");
    assert_eq!(row.last_name, "Owusu");
    assert_eq!(row.status, "pending");
    assert_eq!(row.payment_status, "pending");
    assert_eq!(row.gender, "Female");
    // Bracket derived from the date of birth.
    assert!(!row.age_group.is_empty());
    assert!(row.stripe_subscription_id.is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn resuming_an_existing_registration_creates_no_new_rows(pool: PgPool) {
    let registration = seed_pending_registration(&pool).await;
    let app = build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/billing/checkout-session",
        &serde_json::json!({ "registrationId": registration.id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["url"], MOCK_CHECKOUT_URL);

    assert_eq!(RegistrationRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_registration_id_is_not_found_and_writes_nothing(pool: PgPool) {
    let app = build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/billing/checkout-session",
        &serde_json::json!({ "registrationId": uuid::Uuid::new_v4() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(RegistrationRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn request_must_carry_exactly_one_of_id_or_data(pool: PgPool) {
    let app = build_test_app(pool.clone());

    let response = post_json(
        app.clone(),
        "/api/v1/billing/checkout-session",
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app,
        "/api/v1/billing/checkout-session",
        &serde_json::json!({
            "registrationId": uuid::Uuid::new_v4(),
            "registrationData": ama_submission(),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(RegistrationRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_submissions_are_rejected_before_persisting(pool: PgPool) {
    let app = build_test_app(pool.clone());

    // Unknown enum value: rejected at deserialization.
    let mut bad_gender = ama_submission();
    bad_gender["gender"] = serde_json::json!("Other");
    let response = post_json(
        app.clone(),
        "/api/v1/billing/checkout-session",
        &serde_json::json!({ "registrationData": bad_gender }),
    )
    .await;
    assert!(response.status().is_client_error());

    // Empty name: rejected by validation.
    let mut empty_name = ama_submission();
    empty_name["first_name"] = serde_json::json!("");
    let response = post_json(
        app.clone(),
        "/api/v1/billing/checkout-session",
        &serde_json::json!({ "registrationData": empty_name }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Waiver timestamp without a typed signature: rejected.
    let mut unsigned = ama_submission();
    unsigned["waiver_signature"] = serde_json::json!("");
    let response = post_json(
        app,
        "/api/v1/billing/checkout-session",
        &serde_json::json!({ "registrationData": unsigned }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(RegistrationRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn processor_failure_leaves_the_pending_row_recoverable(pool: PgPool) {
    let app = build_test_app_with(pool.clone(), test_config(), Arc::new(FailingBilling));

    let response = post_json(
        app,
        "/api/v1/billing/checkout-session",
        &serde_json::json!({ "registrationData": ama_submission() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // The pending row is NOT rolled back; it stays recoverable through the
    // resume path.
    assert_eq!(RegistrationRepo::count(&pool).await.unwrap(), 1);
    let rows = RegistrationRepo::list(&pool, 10, 0).await.unwrap();
    assert_eq!(rows[0].status, "pending");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn retrying_with_registration_data_duplicates_the_row(pool: PgPool) {
    // Known duplicate-submission risk: a client that retries the whole
    // submission (rather than resuming by id) creates a second row.
    let app = build_test_app(pool.clone());

    for _ in 0..2 {
        let response = post_json(
            app.clone(),
            "/api/v1/billing/checkout-session",
            &serde_json::json!({ "registrationData": ama_submission() }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(RegistrationRepo::count(&pool).await.unwrap(), 2);
}

// ---------------------------------------------------------------------------
// Settlement webhook
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn settlement_activates_registration_and_rosters_player(pool: PgPool) {
    let registration = seed_pending_registration(&pool).await;
    let app = build_test_app(pool.clone());

    let payload = completed_event("evt_1", &registration.id.to_string(), "sub_123");
    let signature = sign_webhook(&payload);
    let response = post_webhook(app, payload, Some(&signature)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let settled = RegistrationRepo::find_by_id(&pool, registration.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settled.status, "active");
    assert_eq!(settled.payment_status, "paid");
    assert_eq!(settled.stripe_subscription_id.as_deref(), Some("sub_123"));

    let players = PlayerRepo::list_by_source_registration(&pool, registration.id)
        .await
        .unwrap();
    assert_eq!(players.len(), 1);
    let player = &players[0];
    assert_eq!(player.full_name, "Ama Owusu");
    assert_eq!(player.date_of_birth, registration.dob);
    assert_eq!(player.gender, "Female");
    assert_eq!(player.position, "TBD");
    assert_eq!(player.team_assigned, "Unassigned");
    assert_eq!(player.jersey_number, "-");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_reference_acknowledges_without_writes(pool: PgPool) {
    let app = build_test_app(pool.clone());

    let payload = completed_event("evt_1", &uuid::Uuid::new_v4().to_string(), "sub_123");
    let signature = sign_webhook(&payload);
    let response = post_webhook(app, payload, Some(&signature)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(RegistrationRepo::count(&pool).await.unwrap(), 0);
    assert_eq!(PlayerRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_settlement_event_types_are_acknowledged_and_ignored(pool: PgPool) {
    let registration = seed_pending_registration(&pool).await;
    let app = build_test_app(pool.clone());

    let payload = serde_json::to_vec(&serde_json::json!({
        "id": "evt_other",
        "type": "invoice.payment_failed",
        "data": { "object": { "id": "in_1" } }
    }))
    .unwrap();
    let signature = sign_webhook(&payload);
    let response = post_webhook(app, payload, Some(&signature)).await;

    assert_eq!(response.status(), StatusCode::OK);

    let row = RegistrationRepo::find_by_id(&pool, registration.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "pending");
    assert_eq!(PlayerRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn replayed_event_is_deduplicated_by_default(pool: PgPool) {
    let registration = seed_pending_registration(&pool).await;
    let app = build_test_app(pool.clone());

    let payload = completed_event("evt_1", &registration.id.to_string(), "sub_123");
    for _ in 0..2 {
        let signature = sign_webhook(&payload);
        let response = post_webhook(app.clone(), payload.clone(), Some(&signature)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let settled = RegistrationRepo::find_by_id(&pool, registration.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settled.status, "active");
    assert_eq!(PlayerRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn second_completed_session_does_not_duplicate_the_player(pool: PgPool) {
    // A different event id (e.g. a second checkout session for the same
    // registration) passes the event ledger but stops at the player check.
    let registration = seed_pending_registration(&pool).await;
    let app = build_test_app(pool.clone());

    for event_id in ["evt_1", "evt_2"] {
        let payload = completed_event(event_id, &registration.id.to_string(), "sub_123");
        let signature = sign_webhook(&payload);
        let response = post_webhook(app.clone(), payload, Some(&signature)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(PlayerRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn replay_duplicates_the_player_in_faithful_mode(pool: PgPool) {
    // With dedupe off, the legacy behavior is reproduced exactly: the
    // registration update re-applies the same values (no observable change)
    // but the roster insert runs again and duplicates the player.
    let mut config = test_config();
    config.billing.settlement_dedupe = false;

    let registration = seed_pending_registration(&pool).await;
    let app = build_test_app_with(pool.clone(), config, Arc::new(MockBilling));

    let payload = completed_event("evt_1", &registration.id.to_string(), "sub_123");
    for _ in 0..2 {
        let signature = sign_webhook(&payload);
        let response = post_webhook(app.clone(), payload.clone(), Some(&signature)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let settled = RegistrationRepo::find_by_id(&pool, registration.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settled.status, "active");
    assert_eq!(settled.stripe_subscription_id.as_deref(), Some("sub_123"));

    let players = PlayerRepo::list_by_source_registration(&pool, registration.id)
        .await
        .unwrap();
    assert_eq!(players.len(), 2, "faithful mode must duplicate the roster record");
}

// ---------------------------------------------------------------------------
// Signature contract
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn bad_signature_is_rejected_with_no_state_change(pool: PgPool) {
    let registration = seed_pending_registration(&pool).await;
    let app = build_test_app(pool.clone());

    let payload = completed_event("evt_1", &registration.id.to_string(), "sub_123");
    let signature = sign_webhook_with(&payload, "whsec_wrong_secret");
    let response = post_webhook(app, payload, Some(&signature)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = body_text(response).await;
    assert!(text.starts_with("Webhook Error:"), "got body: {text}");

    let row = RegistrationRepo::find_by_id(&pool, registration.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "pending");
    assert_eq!(PlayerRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_signature_header_is_rejected_when_secret_is_configured(pool: PgPool) {
    let registration = seed_pending_registration(&pool).await;
    let app = build_test_app(pool.clone());

    let payload = completed_event("evt_1", &registration.id.to_string(), "sub_123");
    let response = post_webhook(app, payload, None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let row = RegistrationRepo::find_by_id(&pool, registration.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "pending");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unsigned_payloads_are_trusted_when_no_secret_is_configured(pool: PgPool) {
    // Local-development mode: no signing secret, payload trusted as-is.
    let mut config = test_config();
    config.billing.webhook_secret = None;

    let registration = seed_pending_registration(&pool).await;
    let app = build_test_app_with(pool.clone(), config, Arc::new(MockBilling));

    let payload = completed_event("evt_1", &registration.id.to_string(), "sub_123");
    let response = post_webhook(app, payload, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let row = RegistrationRepo::find_by_id(&pool, registration.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "active");
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn full_workflow_from_submission_to_roster(pool: PgPool) {
    let app = build_test_app(pool.clone());

    // 1. Submit the intake payload; expect one pending row and a URL.
    let response = post_json(
        app.clone(),
        "/api/v1/billing/checkout-session",
        &serde_json::json!({ "registrationData": ama_submission() }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["url"], MOCK_CHECKOUT_URL);

    let rows = RegistrationRepo::list(&pool, 10, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    let registration = &rows[0];
    assert_eq!(registration.status, "pending");

    // 2. Deliver the settlement event referencing that row.
    let payload = completed_event("evt_e2e", &registration.id.to_string(), "sub_123");
    let signature = sign_webhook(&payload);
    let response = post_webhook(app, payload, Some(&signature)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // 3. The registration is active/paid with the subscription captured.
    let settled = RegistrationRepo::find_by_id(&pool, registration.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settled.status, "active");
    assert_eq!(settled.payment_status, "paid");
    assert_eq!(settled.stripe_subscription_id.as_deref(), Some("sub_123"));

    // 4. Exactly one roster record, derived with the documented defaults.
    let players = PlayerRepo::list_by_source_registration(&pool, registration.id)
        .await
        .unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].full_name, "Ama Owusu");
    assert_eq!(players[0].team_assigned, "Unassigned");
    assert_eq!(players[0].position, "TBD");
}

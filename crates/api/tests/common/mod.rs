//! Shared helpers for API integration tests.
//!
//! Mirrors the router construction in `main.rs` so tests exercise the same
//! middleware stack (CORS, request ID, timeout, panic recovery) production
//! uses, with the payment processor replaced by in-process fakes.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use touchline_api::auth::jwt::generate_access_token;
use touchline_api::auth::password::hash_password;
use touchline_api::config::{BillingSettings, ServerConfig};
use touchline_api::routes;
use touchline_api::state::AppState;
use touchline_core::status::Role;
use touchline_db::models::registration::{CreateRegistration, Registration};
use touchline_db::models::user::{CreateUser, User};
use touchline_db::repositories::{RegistrationRepo, UserRepo};
use touchline_payments::{BillingProvider, CheckoutRequest, CheckoutSession, PaymentError};

/// Webhook signing secret used by the default test configuration.
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Checkout URL returned by [`MockBilling`].
pub const MOCK_CHECKOUT_URL: &str = "https://checkout.example/c/cs_test_mock";

// ---------------------------------------------------------------------------
// Billing fakes
// ---------------------------------------------------------------------------

/// Billing provider that always succeeds with a fixed hosted-checkout URL.
pub struct MockBilling;

#[async_trait]
impl BillingProvider for MockBilling {
    async fn create_subscription_checkout(
        &self,
        _request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        Ok(CheckoutSession {
            id: "cs_test_mock".to_string(),
            url: MOCK_CHECKOUT_URL.to_string(),
        })
    }
}

/// Billing provider that always fails, simulating a processor outage.
pub struct FailingBilling;

#[async_trait]
impl BillingProvider for FailingBilling {
    async fn create_subscription_checkout(
        &self,
        _request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        Err(PaymentError::Stripe("simulated processor outage".into()))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and a known webhook
/// signing secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: touchline_api::auth::jwt::JwtConfig {
            secret: "integration-test-jwt-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        billing: BillingSettings {
            stripe_secret_key: "sk_test_dummy".to_string(),
            webhook_secret: Some(TEST_WEBHOOK_SECRET.to_string()),
            frontend_base_url: "http://localhost:5173".to_string(),
            club_name: "Harborview FC".to_string(),
            membership_price_cents: 5000,
            membership_currency: "usd".to_string(),
            settlement_dedupe: true,
        },
    }
}

/// Build the full application router with the default config and the
/// always-succeeding billing mock.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), Arc::new(MockBilling))
}

/// Build the application router with explicit config and billing provider.
pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    billing: Arc<dyn BillingProvider>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config),
        billing,
        event_bus: Arc::new(touchline_events::EventBus::default()),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a bearer token.
pub async fn get_authed(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a JSON request with optional bearer token.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send an unauthenticated JSON POST.
pub async fn post_json(app: Router, uri: &str, body: &serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, None, body).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as plain text.
pub async fn body_text(response: Response) -> String {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// Create a user with the given role and a known password
/// (`test-password-123`).
pub async fn seed_user(pool: &PgPool, username: &str, role: Role) -> User {
    let password_hash = hash_password("test-password-123").unwrap();
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash,
            role: role.as_str().to_string(),
            full_name: format!("Test {username}"),
            phone: None,
        },
    )
    .await
    .unwrap()
}

/// Mint an access token for a seeded user, valid against [`test_config`].
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt).unwrap()
}

/// Insert a pending registration directly, bypassing the HTTP layer.
pub async fn seed_pending_registration(pool: &PgPool) -> Registration {
    RegistrationRepo::create(
        pool,
        &CreateRegistration {
            parent_id: None,
            first_name: "Ama".to_string(),
            last_name: "Owusu".to_string(),
            dob: chrono::NaiveDate::from_ymd_opt(2015, 4, 2).unwrap(),
            gender: "Female".to_string(),
            position: "TBD".to_string(),
            jersey_size: "YM".to_string(),
            medical_notes: String::new(),
            birth_cert_path: None,
            photo_url: None,
            waiver_signed_at: Some(chrono::Utc::now()),
            waiver_signature: "Jane Owusu".to_string(),
            status: "pending".to_string(),
            payment_status: "pending".to_string(),
            age_group: "U12".to_string(),
            manual_parent_name: None,
            manual_phone: None,
        },
    )
    .await
    .unwrap()
}

/// The intake submission payload used across billing tests.
pub fn ama_submission() -> serde_json::Value {
    serde_json::json!({
        "first_name": "Ama",
        "last_name": "Owusu",
        "dob": "2015-04-02",
        "gender": "Female",
        "position": "TBD",
        "jersey_size": "YM",
        "photo_url": "https://cdn.example/photos/ama.jpg",
        "waiver_signed_at": "2026-03-01T12:00:00Z",
        "waiver_signature": "Jane Owusu",
    })
}

// ---------------------------------------------------------------------------
// Webhook helpers
// ---------------------------------------------------------------------------

/// Build a completed-checkout event body the way the processor would.
pub fn completed_event(event_id: &str, reference: &str, subscription: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "id": event_id,
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "object": "checkout.session",
                "client_reference_id": reference,
                "subscription": subscription,
            }
        }
    }))
    .unwrap()
}

/// Sign a payload with [`TEST_WEBHOOK_SECRET`] using the processor's v1
/// scheme.
pub fn sign_webhook(payload: &[u8]) -> String {
    sign_webhook_with(payload, TEST_WEBHOOK_SECRET)
}

/// Sign a payload with an arbitrary secret (for bad-signature tests).
pub fn sign_webhook_with(payload: &[u8], secret: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp();
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    )
}

/// POST a raw webhook body, optionally with a `stripe-signature` header.
pub async fn post_webhook(app: Router, payload: Vec<u8>, signature: Option<&str>) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/billing/webhook")
        .header(CONTENT_TYPE, "application/json");
    if let Some(signature) = signature {
        builder = builder.header("stripe-signature", signature);
    }
    let request = builder.body(Body::from(payload)).unwrap();
    app.oneshot(request).await.unwrap()
}

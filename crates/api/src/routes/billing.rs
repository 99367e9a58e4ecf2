//! Route definitions for the `/billing` boundary.

use axum::routing::post;
use axum::Router;

use crate::handlers::billing;
use crate::state::AppState;

/// Routes mounted at `/billing`.
///
/// ```text
/// POST /checkout-session -> create checkout session
/// POST /webhook          -> processor settlement webhook (raw body)
/// ```
///
/// Both routes are unauthenticated: checkout is reached from the intake
/// wizard before any redirect, and the webhook authenticates through its
/// signature instead of a bearer token.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkout-session", post(billing::create_checkout_session))
        .route("/webhook", post(billing::stripe_webhook))
}

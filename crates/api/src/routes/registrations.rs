//! Route definitions for the `/registrations` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::registrations;
use crate::state::AppState;

/// Routes mounted at `/registrations`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(registrations::list).post(registrations::create_manual),
        )
        .route("/mine", get(registrations::list_mine))
        .route(
            "/{id}",
            get(registrations::get).put(registrations::update),
        )
        .route("/{id}/approve", post(registrations::approve))
        .route("/{id}/coach", put(registrations::assign_coach))
        .route(
            "/{id}/payment-status",
            put(registrations::set_payment_status),
        )
}

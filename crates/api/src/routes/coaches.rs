//! Route definitions for the `/coaches` directory.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::coaches;
use crate::state::AppState;

/// Routes mounted at `/coaches`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(coaches::list))
        .route("/{user_id}/promote", post(coaches::promote))
}

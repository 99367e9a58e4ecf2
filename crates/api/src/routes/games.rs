//! Route definitions for the `/games` schedule.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::games;
use crate::state::AppState;

/// Routes mounted at `/games`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(games::list).post(games::create))
        .route("/{id}", put(games::update).delete(games::delete))
}

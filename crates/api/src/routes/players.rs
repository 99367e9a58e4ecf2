//! Route definitions for the `/players` roster resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::players;
use crate::state::AppState;

/// Routes mounted at `/players`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(players::list))
        .route("/mine", get(players::list_mine))
        .route("/{id}", get(players::get).put(players::update))
        .route("/{id}/coach", put(players::assign_coach))
}

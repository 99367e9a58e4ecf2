//! Handlers for the `/games` schedule resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use touchline_core::error::CoreError;
use touchline_core::status::AgeGroup;
use touchline_core::types::DbId;
use touchline_db::models::game::{CreateGame, UpdateGame};
use touchline_db::repositories::GameRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/games
///
/// Fixture list in date order (any authenticated user).
pub async fn list(_user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let games = GameRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: games }))
}

/// POST /api/v1/games
///
/// Schedule a game.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateGame>,
) -> AppResult<impl IntoResponse> {
    if input.opponent.trim().is_empty() {
        return Err(AppError::BadRequest("opponent must not be empty".into()));
    }
    validate_team_group(&input.team_group)?;

    let game = GameRepo::create(&state.pool, &input).await?;

    tracing::info!(game_id = game.id, user_id = admin.user_id, "Game scheduled");
    Ok((StatusCode::CREATED, Json(DataResponse { data: game })))
}

/// PUT /api/v1/games/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGame>,
) -> AppResult<impl IntoResponse> {
    if let Some(team_group) = &input.team_group {
        validate_team_group(team_group)?;
    }

    let updated = GameRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Game", id)))?;

    tracing::info!(game_id = id, user_id = admin.user_id, "Game updated");
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/games/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = GameRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("Game", id)));
    }

    tracing::info!(game_id = id, user_id = admin.user_id, "Game deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// A fixture applies to one age group or to the whole club (`All`).
fn validate_team_group(team_group: &str) -> Result<(), AppError> {
    if team_group == "All" {
        return Ok(());
    }
    AgeGroup::from_str_db(team_group)?;
    Ok(())
}

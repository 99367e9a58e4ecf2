//! Handlers for the `/players` roster resource.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use touchline_core::error::CoreError;
use touchline_core::status::{JerseySize, Position, Role};
use touchline_core::types::{DbId, PlayerId};
use touchline_db::models::player::UpdatePlayer;
use touchline_db::repositories::{PlayerRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::query::{clamp_limit, clamp_offset, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /players/{id}/coach`.
#[derive(Debug, Deserialize)]
pub struct AssignCoachRequest {
    /// `null` clears the assignment.
    pub coach_id: Option<DbId>,
}

/// GET /api/v1/players
///
/// List the roster (staff only), newest first.
pub async fn list(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, 50, 200);
    let offset = clamp_offset(params.offset);

    let players = PlayerRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: players }))
}

/// GET /api/v1/players/mine
///
/// List the players assigned to the authenticated coach.
pub async fn list_mine(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let players = PlayerRepo::list_for_coach(&state.pool, staff.user_id).await?;
    Ok(Json(DataResponse { data: players }))
}

/// GET /api/v1/players/{id}
pub async fn get(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
) -> AppResult<impl IntoResponse> {
    let player = PlayerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Player", id)))?;
    Ok(Json(DataResponse { data: player }))
}

/// PUT /api/v1/players/{id}
///
/// Staff roster edit. Enum-shaped fields are validated against their
/// closed sets before anything is written.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
    Json(input): Json<UpdatePlayer>,
) -> AppResult<impl IntoResponse> {
    if let Some(position) = &input.position {
        Position::from_str_db(position)?;
    }
    if let Some(size) = &input.jersey_size {
        JerseySize::from_str_db(size)?;
    }
    if let Some(full_name) = &input.full_name {
        if full_name.trim().is_empty() {
            return Err(AppError::BadRequest("full_name must not be empty".into()));
        }
    }

    let updated = PlayerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Player", id)))?;

    tracing::info!(player_id = %id, user_id = admin.user_id, "Player updated");
    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/players/{id}/coach
///
/// Reassign (or clear) the player's coach.
pub async fn assign_coach(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
    Json(input): Json<AssignCoachRequest>,
) -> AppResult<impl IntoResponse> {
    if let Some(coach_id) = input.coach_id {
        let coach = UserRepo::find_by_id(&state.pool, coach_id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::not_found("User", coach_id)))?;
        let role = Role::from_str_db(&coach.role)?;
        if !role.is_staff() {
            return Err(AppError::BadRequest(format!(
                "User {coach_id} is not a coach"
            )));
        }
    }

    let updated = PlayerRepo::assign_coach(&state.pool, id, input.coach_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Player", id)))?;

    tracing::info!(
        player_id = %id,
        coach_id = ?input.coach_id,
        user_id = admin.user_id,
        "Player coach assignment updated"
    );
    Ok(Json(DataResponse { data: updated }))
}

//! Handlers for the `/coaches` directory and coach promotion.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use touchline_core::error::CoreError;
use touchline_core::status::Role;
use touchline_core::types::DbId;
use touchline_db::models::coach::UpsertCoachProfile;
use touchline_db::repositories::{CoachRepo, UserRepo};
use touchline_events::ClubEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /coaches/{user_id}/promote`.
#[derive(Debug, Deserialize)]
pub struct PromoteRequest {
    /// Directory photo; falls back to the user's profile photo.
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// GET /api/v1/coaches
///
/// Public coach directory (any authenticated user).
pub async fn list(_user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let coaches = CoachRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: coaches }))
}

/// POST /api/v1/coaches/{user_id}/promote
///
/// Promote a user to coach: the role update happens first, then the
/// directory entry is written. If the directory write fails, the role
/// change is rolled back so the two stay consistent.
pub async fn promote(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<PromoteRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user_id)))?;

    let previous_role = Role::from_str_db(&user.role)?;
    if previous_role == Role::Admin {
        return Err(AppError::Core(CoreError::Conflict(
            "Admins already hold staff access".into(),
        )));
    }

    UserRepo::set_role(&state.pool, user_id, Role::Coach.as_str())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user_id)))?;

    let profile_input = UpsertCoachProfile {
        full_name: user.full_name.clone(),
        photo_url: input.photo_url.or(user.photo_url),
        bio: input.bio.unwrap_or_default(),
    };

    let profile = match CoachRepo::upsert(&state.pool, user_id, &profile_input).await {
        Ok(profile) => profile,
        Err(e) => {
            // Compensate: put the role back before surfacing the failure.
            tracing::error!(error = %e, user_id, "Coach directory write failed, rolling back role");
            if let Err(rollback_err) =
                UserRepo::set_role(&state.pool, user_id, previous_role.as_str()).await
            {
                tracing::error!(
                    error = %rollback_err,
                    user_id,
                    "Role rollback failed; user role and coach directory are inconsistent"
                );
            }
            return Err(AppError::Database(e));
        }
    };

    tracing::info!(user_id, promoted_by = admin.user_id, "User promoted to coach");
    state.event_bus.publish(
        ClubEvent::new("coach.promoted")
            .with_source("user", user_id)
            .with_actor(admin.user_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: profile })))
}

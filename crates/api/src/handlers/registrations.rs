//! Handlers for the `/registrations` resource (staff + guardian views).
//!
//! Webhook settlement can race any of these staff edits; row updates are
//! last-writer-wins single-statement UPDATEs with no version check, matching
//! how the rest of the system treats shared rows.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use touchline_core::error::CoreError;
use touchline_core::status::{
    AgeGroup, Gender, JerseySize, PaymentStatus, Position, RegistrationStatus, Role,
};
use touchline_core::types::{DbId, RegistrationId};
use touchline_db::models::registration::{CreateRegistration, UpdateRegistration};
use touchline_db::repositories::{RegistrationRepo, UserRepo};
use touchline_events::ClubEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::query::{clamp_limit, clamp_offset, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for staff manual registration.
///
/// Manual entries are created directly `active` with payment bypassed; the
/// guardian is recorded as free text because no account exists for them.
/// Payment can still be collected later through the checkout resume path.
#[derive(Debug, Deserialize)]
pub struct ManualRegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub dob: chrono::NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub jersey_size: JerseySize,
    #[serde(default)]
    pub medical_notes: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Stamps `waiver_signed_at` with the current time when set.
    #[serde(default)]
    pub waiver_signed: bool,
    #[serde(default)]
    pub manual_parent_name: Option<String>,
    #[serde(default)]
    pub manual_phone: Option<String>,
    /// Explicit bracket; derived from the date of birth when omitted.
    #[serde(default)]
    pub age_group: Option<AgeGroup>,
}

/// Request body for `PUT /registrations/{id}/coach`.
#[derive(Debug, Deserialize)]
pub struct AssignCoachRequest {
    /// `null` clears the assignment.
    pub coach_id: Option<DbId>,
}

/// Request body for `PUT /registrations/{id}/payment-status`.
#[derive(Debug, Deserialize)]
pub struct PaymentStatusRequest {
    pub payment_status: PaymentStatus,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/registrations
///
/// List registrations (staff only), newest first.
pub async fn list(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, 50, 200);
    let offset = clamp_offset(params.offset);

    let registrations = RegistrationRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse {
        data: registrations,
    }))
}

/// GET /api/v1/registrations/mine
///
/// List the authenticated guardian's own submissions.
pub async fn list_mine(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let registrations = RegistrationRepo::list_for_parent(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: registrations,
    }))
}

/// GET /api/v1/registrations/{id}
pub async fn get(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<RegistrationId>,
) -> AppResult<impl IntoResponse> {
    let registration = RegistrationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Registration", id)))?;
    Ok(Json(DataResponse { data: registration }))
}

/// POST /api/v1/registrations
///
/// Staff manual entry: the row is created `active` immediately, bypassing
/// payment. Hand the returned id to the checkout resume path if payment
/// should still be collected.
pub async fn create_manual(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ManualRegistrationRequest>,
) -> AppResult<impl IntoResponse> {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "first_name and last_name must not be empty".into(),
        ));
    }

    let age_group = input
        .age_group
        .unwrap_or_else(|| AgeGroup::for_dob(input.dob, Utc::now().year()));

    let registration = RegistrationRepo::create(
        &state.pool,
        &CreateRegistration {
            parent_id: None,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            dob: input.dob,
            gender: input.gender.as_str().to_string(),
            position: input.position.as_str().to_string(),
            jersey_size: input.jersey_size.as_str().to_string(),
            medical_notes: input.medical_notes,
            birth_cert_path: None,
            photo_url: input.photo_url,
            waiver_signed_at: input.waiver_signed.then(Utc::now),
            waiver_signature: input.manual_parent_name.clone().unwrap_or_default(),
            status: RegistrationStatus::Active.as_str().to_string(),
            payment_status: PaymentStatus::Unset.as_str().to_string(),
            age_group: age_group.as_str().to_string(),
            manual_parent_name: input.manual_parent_name,
            manual_phone: input.manual_phone,
        },
    )
    .await?;

    tracing::info!(
        registration_id = %registration.id,
        user_id = admin.user_id,
        "Registration created manually"
    );
    state.event_bus.publish(
        ClubEvent::new("registration.created")
            .with_source("registration", registration.id)
            .with_actor(admin.user_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: registration })))
}

/// PUT /api/v1/registrations/{id}
///
/// Staff edit of cosmetic fields. Enum-shaped fields are validated against
/// their closed sets before anything is written.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<RegistrationId>,
    Json(input): Json<UpdateRegistration>,
) -> AppResult<impl IntoResponse> {
    validate_update_enums(&input)?;

    let updated = RegistrationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Registration", id)))?;

    tracing::info!(registration_id = %id, user_id = admin.user_id, "Registration updated");
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/registrations/{id}/approve
///
/// Activate a registration without payment. Idempotent: approving an
/// already-active row re-applies the same value.
pub async fn approve(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<RegistrationId>,
) -> AppResult<impl IntoResponse> {
    let registration = RegistrationRepo::approve(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Registration", id)))?;

    tracing::info!(registration_id = %id, user_id = admin.user_id, "Registration approved");
    state.event_bus.publish(
        ClubEvent::new("registration.approved")
            .with_source("registration", id)
            .with_actor(admin.user_id),
    );

    Ok(Json(DataResponse { data: registration }))
}

/// PUT /api/v1/registrations/{id}/coach
///
/// Assign (or clear) the responsible coach. The target must hold a staff
/// role.
pub async fn assign_coach(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<RegistrationId>,
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

    let updated = RegistrationRepo::assign_coach(&state.pool, id, input.coach_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Registration", id)))?;

    tracing::info!(
        registration_id = %id,
        coach_id = ?input.coach_id,
        user_id = admin.user_id,
        "Coach assignment updated"
    );
    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/registrations/{id}/payment-status
///
/// Staff override of the payment status (e.g. recording an offline
/// payment). Marking a pending registration `paid` also activates it so the
/// paid-implies-active invariant holds.
pub async fn set_payment_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<RegistrationId>,
    Json(input): Json<PaymentStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let registration = RegistrationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Registration", id)))?;

    let status = RegistrationStatus::from_str_db(&registration.status)?;
    if input.payment_status == PaymentStatus::Paid && status == RegistrationStatus::Pending {
        RegistrationRepo::approve(&state.pool, id).await?;
    }

    let updated =
        RegistrationRepo::set_payment_status(&state.pool, id, input.payment_status.as_str())
            .await?
            .ok_or_else(|| AppError::Core(CoreError::not_found("Registration", id)))?;

    tracing::info!(
        registration_id = %id,
        payment_status = input.payment_status.as_str(),
        user_id = admin.user_id,
        "Payment status updated"
    );
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject update payloads whose enum-shaped fields fall outside the closed
/// sets. The update DTO keeps plain strings so COALESCE partial updates
/// stay simple; this is the boundary check.
fn validate_update_enums(input: &UpdateRegistration) -> Result<(), AppError> {
    if let Some(gender) = &input.gender {
        Gender::from_str_db(gender)?;
    }
    if let Some(position) = &input.position {
        Position::from_str_db(position)?;
    }
    if let Some(size) = &input.jersey_size {
        JerseySize::from_str_db(size)?;
    }
    if let Some(age_group) = &input.age_group {
        AgeGroup::from_str_db(age_group)?;
    }
    Ok(())
}

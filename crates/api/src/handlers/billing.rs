//! Billing boundary: checkout-session creation and the settlement webhook.
//!
//! These are the two server legs of the registration-to-payment workflow.
//! The browser submits intake data here, gets redirected to the hosted
//! checkout, and the processor later reports completion out-of-band through
//! the webhook -- possibly seconds or minutes later, on another connection,
//! and possibly more than once. The webhook handler is written to tolerate
//! zero, one, or many deliveries in any order.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use touchline_core::error::CoreError;
use touchline_core::intake::RegistrationSubmission;
use touchline_core::status::{AgeGroup, PaymentStatus, RegistrationStatus};
use touchline_core::types::{DbId, RegistrationId};
use touchline_db::models::player::CreatePlayer;
use touchline_db::models::registration::{CreateRegistration, Registration};
use touchline_db::repositories::{PlayerRepo, ProcessedEventRepo, RegistrationRepo};
use touchline_events::ClubEvent;
use touchline_payments::webhook::{self, SettlementEvent, CHECKOUT_COMPLETED};
use touchline_payments::CheckoutRequest;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /billing/checkout-session`.
///
/// Exactly one of `registrationData` (new submission) or `registrationId`
/// (resume an existing row, e.g. from the staff payment page) must be set.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    #[serde(default)]
    pub registration_data: Option<RegistrationSubmission>,
    #[serde(default)]
    pub registration_id: Option<RegistrationId>,
    /// Overrides the configured post-payment redirect.
    #[serde(default)]
    pub success_url: Option<String>,
    /// Guardian account the submission belongs to, when known.
    #[serde(default)]
    pub parent_id: Option<DbId>,
}

/// Response body: the hosted checkout page to redirect the browser to.
///
/// Deliberately NOT wrapped in the `{ "data": ... }` envelope -- the intake
/// wizard reads `url` off the top level before redirecting, and that wire
/// contract predates this service.
#[derive(Debug, Serialize)]
pub struct CheckoutUrlResponse {
    pub url: String,
}

// ---------------------------------------------------------------------------
// Checkout session creation
// ---------------------------------------------------------------------------

/// POST /api/v1/billing/checkout-session
///
/// Persists a pending registration (unless resuming one) and opens a
/// subscription checkout session bound to it via `client_reference_id`.
///
/// No idempotency key accompanies the processor call: if the processor
/// fails and the client retries with `registrationData` again, a second
/// pending row is created. The pending row from a failed attempt is not
/// rolled back either -- it stays recoverable through the resume path.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(input): Json<CheckoutSessionRequest>,
) -> AppResult<Json<CheckoutUrlResponse>> {
    let registration = match (input.registration_id, input.registration_data) {
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "Provide either registrationId or registrationData, not both".into(),
            ))
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either registrationId or registrationData is required".into(),
            ))
        }
        (Some(id), None) => RegistrationRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::not_found("Registration", id)))?,
        (None, Some(data)) => {
            data.validate()?;
            data.check_waiver()?;

            let age_group = AgeGroup::for_dob(data.dob, Utc::now().year());
            let created = RegistrationRepo::create(
                &state.pool,
                &CreateRegistration {
                    parent_id: input.parent_id,
                    first_name: data.first_name,
                    last_name: data.last_name,
                    dob: data.dob,
                    gender: data.gender.as_str().to_string(),
                    position: data.position.as_str().to_string(),
                    jersey_size: data.jersey_size.as_str().to_string(),
                    medical_notes: data.medical_notes,
                    birth_cert_path: data.birth_cert_path,
                    photo_url: data.photo_url,
                    waiver_signed_at: data.waiver_signed_at,
                    waiver_signature: data.waiver_signature,
                    status: RegistrationStatus::Pending.as_str().to_string(),
                    payment_status: PaymentStatus::Pending.as_str().to_string(),
                    age_group: age_group.as_str().to_string(),
                    manual_parent_name: None,
                    manual_phone: None,
                },
            )
            .await?;

            tracing::info!(registration_id = %created.id, "Registration created, awaiting settlement");
            state.event_bus.publish(
                ClubEvent::new("registration.created").with_source("registration", created.id),
            );
            created
        }
    };

    let billing = &state.config.billing;
    let request = CheckoutRequest {
        reference_id: registration.id.to_string(),
        product_name: format!("{} Membership", billing.club_name),
        description: format!(
            "Monthly membership for {} {}",
            registration.first_name, registration.last_name
        ),
        unit_amount_cents: billing.membership_price_cents,
        currency: billing.membership_currency.clone(),
        success_url: input
            .success_url
            .unwrap_or_else(|| billing.default_success_url()),
        cancel_url: billing.cancel_url(),
    };

    let session = state.billing.create_subscription_checkout(&request).await?;

    tracing::info!(
        registration_id = %registration.id,
        session_id = %session.id,
        "Checkout session created"
    );

    Ok(Json(CheckoutUrlResponse { url: session.url }))
}

// ---------------------------------------------------------------------------
// Settlement webhook
// ---------------------------------------------------------------------------

/// POST /api/v1/billing/webhook
///
/// Receives the processor's settlement events. The body must stay raw
/// (`Bytes`) because the signature is computed over the exact bytes.
///
/// Response policy: signature or parse failures are a plain-text 400; once
/// an event is accepted, the handler ALWAYS acknowledges with 200 -- even
/// when a downstream write fails -- so the processor does not redeliver.
/// Registration activation is the durable source of truth; roster
/// materialization is best-effort and reconciled manually if it fails.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event = match authenticate_event(&state, &headers, &body) {
        Ok(event) => event,
        Err(message) => {
            tracing::error!(error = %message, "Webhook rejected");
            return (StatusCode::BAD_REQUEST, message).into_response();
        }
    };

    match event {
        SettlementEvent::Ignored { event_type, .. } => {
            tracing::debug!(event_type = %event_type, "Unhandled webhook event type");
        }
        SettlementEvent::CheckoutCompleted {
            event_id,
            session_id,
            client_reference_id,
            subscription_id,
        } => {
            tracing::info!(
                event_id = %event_id,
                session_id = ?session_id,
                "Processing completed checkout"
            );
            settle(&state, &event_id, client_reference_id, subscription_id).await;
        }
    }

    StatusCode::OK.into_response()
}

/// Verify (when a signing secret is configured) and parse the raw payload.
///
/// Without a secret the payload is trusted as-is. That mode exists for
/// local development only; startup warns loudly when it is active.
fn authenticate_event(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<SettlementEvent, String> {
    match &state.config.billing.webhook_secret {
        Some(secret) => {
            let signature = headers
                .get("stripe-signature")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| "Webhook Error: missing stripe-signature header".to_string())?;

            webhook::verify_and_parse(
                body,
                signature,
                secret,
                webhook::DEFAULT_TOLERANCE_SECS,
                Utc::now().timestamp(),
            )
            .map_err(|e| format!("Webhook Error: {e}"))
        }
        None => webhook::parse_event(body).map_err(|e| format!("Webhook Error: {e}")),
    }
}

/// Apply a completed checkout to the referenced registration.
///
/// Failures in here are logged, never surfaced: the event has already been
/// accepted and will be acknowledged regardless.
async fn settle(
    state: &AppState,
    event_id: &str,
    client_reference_id: Option<String>,
    subscription_id: Option<String>,
) {
    let Some(reference) = client_reference_id else {
        tracing::warn!(event_id = %event_id, "Completed checkout carries no client_reference_id");
        return;
    };

    let Ok(registration_id) = reference.parse::<Uuid>() else {
        tracing::warn!(
            event_id = %event_id,
            reference = %reference,
            "client_reference_id is not a registration id"
        );
        return;
    };

    // Dedupe ledger: replays of an already-processed event id stop here.
    if state.config.billing.settlement_dedupe && !event_id.is_empty() {
        match ProcessedEventRepo::record(
            &state.pool,
            event_id,
            CHECKOUT_COMPLETED,
            Some(registration_id),
        )
        .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(
                    event_id = %event_id,
                    registration_id = %registration_id,
                    "Replayed settlement event, skipping"
                );
                state.event_bus.publish(
                    ClubEvent::new("settlement.duplicate")
                        .with_source("registration", registration_id),
                );
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, event_id = %event_id, "Failed to record event id");
                return;
            }
        }
    }

    match RegistrationRepo::mark_settled(&state.pool, registration_id, subscription_id.as_deref())
        .await
    {
        Ok(Some(registration)) => {
            tracing::info!(registration_id = %registration.id, "Registration activated");
            state.event_bus.publish(
                ClubEvent::new("registration.activated")
                    .with_source("registration", registration.id)
                    .with_payload(serde_json::json!({
                        "subscription_id": registration.stripe_subscription_id,
                    })),
            );

            materialize_player(state, &registration).await;
        }
        Ok(None) => {
            tracing::warn!(
                registration_id = %registration_id,
                "No registration matches the checkout reference"
            );
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                registration_id = %registration_id,
                "Error updating registration"
            );
        }
    }
}

/// Derive the roster record from a freshly activated registration.
///
/// With dedupe enabled the insert is conditional on no player existing for
/// the registration; otherwise it is unconditional, and a replayed event
/// creates a second row. Either way, insert failure does not roll back the
/// activation.
async fn materialize_player(state: &AppState, registration: &Registration) {
    if state.config.billing.settlement_dedupe {
        match PlayerRepo::list_by_source_registration(&state.pool, registration.id).await {
            Ok(existing) if !existing.is_empty() => {
                tracing::info!(
                    registration_id = %registration.id,
                    "Player already materialized for registration"
                );
                return;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to check for existing player");
                return;
            }
        }
    }

    let input = CreatePlayer {
        source_registration_id: Some(registration.id),
        parent_id: registration.parent_id,
        full_name: format!("{} {}", registration.first_name, registration.last_name),
        date_of_birth: registration.dob,
        gender: registration.gender.clone(),
        position: registration.position.clone(),
        jersey_size: registration.jersey_size.clone(),
        jersey_number: "-".to_string(),
        medical_notes: registration.medical_notes.clone(),
        photo_url: registration.photo_url.clone(),
        team_assigned: "Unassigned".to_string(),
        coach_id: registration.coach_id,
    };

    match PlayerRepo::create(&state.pool, &input).await {
        Ok(player) => {
            tracing::info!(
                player_id = %player.id,
                registration_id = %registration.id,
                "Player record created from registration"
            );
            state.event_bus.publish(
                ClubEvent::new("player.rostered")
                    .with_source("player", player.id)
                    .with_payload(serde_json::json!({
                        "registration_id": registration.id,
                    })),
            );
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                registration_id = %registration.id,
                "Error creating player record"
            );
        }
    }
}

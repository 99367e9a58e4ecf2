//! Registration entity model and DTOs.
//!
//! A registration is one guardian's submission for one child, created
//! `pending` by the intake wizard (or directly `active` by staff manual
//! entry) and settled by the billing webhook.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use touchline_core::types::{DbId, RegistrationId, Timestamp};

/// Full registration row from the `registrations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub parent_id: Option<DbId>,
    pub first_name: String,
    pub last_name: String,
    pub dob: chrono::NaiveDate,
    pub gender: String,
    pub position: String,
    pub jersey_size: String,
    pub medical_notes: String,
    pub birth_cert_path: Option<String>,
    pub photo_url: Option<String>,
    pub waiver_signed_at: Option<Timestamp>,
    pub waiver_signature: String,
    pub status: String,
    pub payment_status: String,
    pub stripe_subscription_id: Option<String>,
    pub coach_id: Option<DbId>,
    pub age_group: String,
    pub manual_parent_name: Option<String>,
    pub manual_phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert parameters for a new registration.
///
/// `status` / `payment_status` are set by the caller because the two entry
/// paths differ: intake submissions start `pending`/`pending`, staff manual
/// entries may start `active` with payment bypassed.
#[derive(Debug, Clone)]
pub struct CreateRegistration {
    pub parent_id: Option<DbId>,
    pub first_name: String,
    pub last_name: String,
    pub dob: chrono::NaiveDate,
    pub gender: String,
    pub position: String,
    pub jersey_size: String,
    pub medical_notes: String,
    pub birth_cert_path: Option<String>,
    pub photo_url: Option<String>,
    pub waiver_signed_at: Option<Timestamp>,
    pub waiver_signature: String,
    pub status: String,
    pub payment_status: String,
    pub age_group: String,
    pub manual_parent_name: Option<String>,
    pub manual_phone: Option<String>,
}

/// DTO for staff edits of cosmetic registration fields. All optional.
#[derive(Debug, Deserialize)]
pub struct UpdateRegistration {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<chrono::NaiveDate>,
    pub gender: Option<String>,
    pub position: Option<String>,
    pub jersey_size: Option<String>,
    pub medical_notes: Option<String>,
    pub photo_url: Option<String>,
    pub age_group: Option<String>,
    pub manual_parent_name: Option<String>,
    pub manual_phone: Option<String>,
}

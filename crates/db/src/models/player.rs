//! Player (roster record) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use touchline_core::types::{DbId, PlayerId, RegistrationId, Timestamp};

/// Full player row from the `players` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub source_registration_id: Option<RegistrationId>,
    pub parent_id: Option<DbId>,
    pub full_name: String,
    pub date_of_birth: chrono::NaiveDate,
    pub gender: String,
    pub position: String,
    pub jersey_size: String,
    pub jersey_number: String,
    pub medical_notes: String,
    pub photo_url: Option<String>,
    pub team_assigned: String,
    pub coach_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert parameters for a new player.
#[derive(Debug, Clone)]
pub struct CreatePlayer {
    pub source_registration_id: Option<RegistrationId>,
    pub parent_id: Option<DbId>,
    pub full_name: String,
    pub date_of_birth: chrono::NaiveDate,
    pub gender: String,
    pub position: String,
    pub jersey_size: String,
    pub jersey_number: String,
    pub medical_notes: String,
    pub photo_url: Option<String>,
    pub team_assigned: String,
    pub coach_id: Option<DbId>,
}

/// DTO for staff roster edits. All fields optional.
#[derive(Debug, Deserialize)]
pub struct UpdatePlayer {
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub jersey_size: Option<String>,
    pub jersey_number: Option<String>,
    pub medical_notes: Option<String>,
    pub photo_url: Option<String>,
    pub team_assigned: Option<String>,
    pub coach_id: Option<DbId>,
}

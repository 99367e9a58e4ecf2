//! Coach directory model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use touchline_core::types::{DbId, Timestamp};

/// A coach directory row from the `coach_profiles` table.
///
/// Keyed by the coach's user id; the row exists only while the user holds
/// the coach (or admin) role.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoachProfile {
    pub user_id: DbId,
    pub full_name: String,
    pub photo_url: Option<String>,
    pub bio: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating/refreshing a coach directory entry.
#[derive(Debug, Deserialize)]
pub struct UpsertCoachProfile {
    pub full_name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub bio: String,
}

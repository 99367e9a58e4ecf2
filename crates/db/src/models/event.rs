//! Persisted club event model.

use serde::Serialize;
use sqlx::FromRow;
use touchline_core::types::{DbId, Timestamp};

/// A row from the `club_events` table.
///
/// `source_entity_id` is TEXT because event sources span both key shapes:
/// UUID-keyed registrations/players and BIGSERIAL-keyed users/games.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClubEventRow {
    pub id: DbId,
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<String>,
    pub actor_user_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}

//! Repository for the `club_events` table.

use sqlx::PgPool;
use touchline_core::types::DbId;

use crate::models::event::ClubEventRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, event_type, source_entity_type, source_entity_id, actor_user_id, payload, created_at";

/// Append-only store for domain events.
pub struct EventRepo;

impl EventRepo {
    /// Insert an event row, returning its id.
    pub async fn insert(
        pool: &PgPool,
        event_type: &str,
        source_entity_type: Option<&str>,
        source_entity_id: Option<&str>,
        actor_user_id: Option<DbId>,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO club_events \
                 (event_type, source_entity_type, source_entity_id, actor_user_id, payload) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(event_type)
        .bind(source_entity_type)
        .bind(source_entity_id)
        .bind(actor_user_id)
        .bind(payload)
        .fetch_one(pool)
        .await
    }

    /// List the most recent events, newest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<ClubEventRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM club_events ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, ClubEventRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

//! Repository for the `processed_webhook_events` dedupe ledger.

use sqlx::PgPool;
use touchline_core::types::RegistrationId;

/// Records processor event ids that have already been settled.
pub struct ProcessedEventRepo;

impl ProcessedEventRepo {
    /// Record an event id. Returns `true` the first time an id is seen and
    /// `false` on replay (the insert hits the primary key and is skipped).
    pub async fn record(
        pool: &PgPool,
        event_id: &str,
        event_type: &str,
        registration_id: Option<RegistrationId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO processed_webhook_events (event_id, event_type, registration_id) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (event_id) DO NOTHING",
        )
        .bind(event_id)
        .bind(event_type)
        .bind(registration_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check whether an event id has been processed before.
    pub async fn exists(pool: &PgPool, event_id: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM processed_webhook_events WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }
}

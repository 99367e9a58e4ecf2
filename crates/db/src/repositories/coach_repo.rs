//! Repository for the `coach_profiles` table.

use sqlx::PgPool;
use touchline_core::types::DbId;

use crate::models::coach::{CoachProfile, UpsertCoachProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "user_id, full_name, photo_url, bio, created_at, updated_at";

/// Provides operations on the public coach directory.
pub struct CoachRepo;

impl CoachRepo {
    /// Insert or refresh the directory entry for a user.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertCoachProfile,
    ) -> Result<CoachProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO coach_profiles (user_id, full_name, photo_url, bio) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 full_name = EXCLUDED.full_name, \
                 photo_url = EXCLUDED.photo_url, \
                 bio = EXCLUDED.bio, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoachProfile>(&query)
            .bind(user_id)
            .bind(&input.full_name)
            .bind(&input.photo_url)
            .bind(&input.bio)
            .fetch_one(pool)
            .await
    }

    /// Find a directory entry by user id.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<CoachProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coach_profiles WHERE user_id = $1");
        sqlx::query_as::<_, CoachProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List all coaches, ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<CoachProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coach_profiles ORDER BY full_name ASC");
        sqlx::query_as::<_, CoachProfile>(&query)
            .fetch_all(pool)
            .await
    }

    /// Remove a directory entry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM coach_profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `players` table.

use sqlx::PgPool;
use touchline_core::types::{DbId, PlayerId, RegistrationId};
use uuid::Uuid;

use crate::models::player::{CreatePlayer, Player, UpdatePlayer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, source_registration_id, parent_id, full_name, date_of_birth, gender, \
    position, jersey_size, jersey_number, medical_notes, photo_url, \
    team_assigned, coach_id, created_at, updated_at";

/// Provides CRUD operations for roster records.
pub struct PlayerRepo;

impl PlayerRepo {
    /// Insert a new player, returning the created row.
    ///
    /// This is an unconditional insert: uniqueness per source registration
    /// is NOT enforced here (see the settlement handler's dedupe setting).
    pub async fn create(pool: &PgPool, input: &CreatePlayer) -> Result<Player, sqlx::Error> {
        let query = format!(
            "INSERT INTO players (id, source_registration_id, parent_id, full_name, \
                 date_of_birth, gender, position, jersey_size, jersey_number, \
                 medical_notes, photo_url, team_assigned, coach_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(Uuid::new_v4())
            .bind(input.source_registration_id)
            .bind(input.parent_id)
            .bind(&input.full_name)
            .bind(input.date_of_birth)
            .bind(&input.gender)
            .bind(&input.position)
            .bind(&input.jersey_size)
            .bind(&input.jersey_number)
            .bind(&input.medical_notes)
            .bind(&input.photo_url)
            .bind(&input.team_assigned)
            .bind(input.coach_id)
            .fetch_one(pool)
            .await
    }

    /// Find a player by ID.
    pub async fn find_by_id(pool: &PgPool, id: PlayerId) -> Result<Option<Player>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players WHERE id = $1");
        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all players, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Player>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM players ORDER BY created_at DESC LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Player>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List every player materialized from a given registration, oldest
    /// first. More than one row here means a settlement replay duplicated
    /// the roster record.
    pub async fn list_by_source_registration(
        pool: &PgPool,
        registration_id: RegistrationId,
    ) -> Result<Vec<Player>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM players \
             WHERE source_registration_id = $1 \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(registration_id)
            .fetch_all(pool)
            .await
    }

    /// List players assigned to a coach, ordered by name.
    pub async fn list_for_coach(
        pool: &PgPool,
        coach_id: DbId,
    ) -> Result<Vec<Player>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM players WHERE coach_id = $1 ORDER BY full_name ASC");
        sqlx::query_as::<_, Player>(&query)
            .bind(coach_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a staff roster edit. Only non-`None` fields are applied.
    /// Returns `None` if no row with the given `id` exists.
    ///
    /// `coach_id` cannot be cleared through this method (COALESCE keeps the
    /// old value for `None`); reassignment to no coach goes through
    /// [`PlayerRepo::assign_coach`].
    pub async fn update(
        pool: &PgPool,
        id: PlayerId,
        input: &UpdatePlayer,
    ) -> Result<Option<Player>, sqlx::Error> {
        let query = format!(
            "UPDATE players SET \
                 full_name = COALESCE($2, full_name), \
                 position = COALESCE($3, position), \
                 jersey_size = COALESCE($4, jersey_size), \
                 jersey_number = COALESCE($5, jersey_number), \
                 medical_notes = COALESCE($6, medical_notes), \
                 photo_url = COALESCE($7, photo_url), \
                 team_assigned = COALESCE($8, team_assigned), \
                 coach_id = COALESCE($9, coach_id), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.position)
            .bind(&input.jersey_size)
            .bind(&input.jersey_number)
            .bind(&input.medical_notes)
            .bind(&input.photo_url)
            .bind(&input.team_assigned)
            .bind(input.coach_id)
            .fetch_optional(pool)
            .await
    }

    /// Assign (or clear) the player's coach.
    pub async fn assign_coach(
        pool: &PgPool,
        id: PlayerId,
        coach_id: Option<DbId>,
    ) -> Result<Option<Player>, sqlx::Error> {
        let query = format!(
            "UPDATE players SET coach_id = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .bind(coach_id)
            .fetch_optional(pool)
            .await
    }

    /// Count all player rows. Used by settlement tests and dashboards.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM players")
            .fetch_one(pool)
            .await
    }
}

//! Repository for the `games` table.

use sqlx::PgPool;
use touchline_core::types::DbId;

use crate::models::game::{CreateGame, Game, UpdateGame};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, game_date, game_time, opponent, location, team_group, created_at, updated_at";

/// Provides CRUD operations for scheduled games.
pub struct GameRepo;

impl GameRepo {
    /// Schedule a new game, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateGame) -> Result<Game, sqlx::Error> {
        let query = format!(
            "INSERT INTO games (game_date, game_time, opponent, location, team_group) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Game>(&query)
            .bind(input.game_date)
            .bind(input.game_time)
            .bind(&input.opponent)
            .bind(&input.location)
            .bind(&input.team_group)
            .fetch_one(pool)
            .await
    }

    /// Find a game by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Game>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM games WHERE id = $1");
        sqlx::query_as::<_, Game>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all games in fixture order (soonest first).
    pub async fn list(pool: &PgPool) -> Result<Vec<Game>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM games ORDER BY game_date ASC, game_time ASC");
        sqlx::query_as::<_, Game>(&query).fetch_all(pool).await
    }

    /// Edit a scheduled game. Only non-`None` fields are applied.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGame,
    ) -> Result<Option<Game>, sqlx::Error> {
        let query = format!(
            "UPDATE games SET \
                 game_date = COALESCE($2, game_date), \
                 game_time = COALESCE($3, game_time), \
                 opponent = COALESCE($4, opponent), \
                 location = COALESCE($5, location), \
                 team_group = COALESCE($6, team_group), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Game>(&query)
            .bind(id)
            .bind(input.game_date)
            .bind(input.game_time)
            .bind(&input.opponent)
            .bind(&input.location)
            .bind(&input.team_group)
            .fetch_optional(pool)
            .await
    }

    /// Delete a game. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Game (fixture) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use touchline_core::types::{DbId, Timestamp};

/// A scheduled game row from the `games` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Game {
    pub id: DbId,
    pub game_date: chrono::NaiveDate,
    pub game_time: chrono::NaiveTime,
    pub opponent: String,
    pub location: String,
    /// Age group the fixture applies to, or `All`.
    pub team_group: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for scheduling a new game.
#[derive(Debug, Deserialize)]
pub struct CreateGame {
    pub game_date: chrono::NaiveDate,
    pub game_time: chrono::NaiveTime,
    pub opponent: String,
    pub location: String,
    #[serde(default = "default_team_group")]
    pub team_group: String,
}

fn default_team_group() -> String {
    "All".to_string()
}

/// DTO for editing a scheduled game. All fields optional.
#[derive(Debug, Deserialize)]
pub struct UpdateGame {
    pub game_date: Option<chrono::NaiveDate>,
    pub game_time: Option<chrono::NaiveTime>,
    pub opponent: Option<String>,
    pub location: Option<String>,
    pub team_group: Option<String>,
}

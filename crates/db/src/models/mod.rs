//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Status-like columns are stored as TEXT and constrained by CHECK
//! constraints; the closed enumerations in `touchline_core::status` are
//! applied at the API boundary.

pub mod coach;
pub mod event;
pub mod game;
pub mod player;
pub mod registration;
pub mod session;
pub mod user;

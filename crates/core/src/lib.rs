//! Domain core for the touchline club-management backend.
//!
//! Pure types and logic only: status enumerations with their transition
//! rules, the intake wizard state machine, and shared error/id types.
//! Nothing in this crate performs I/O.

pub mod error;
pub mod intake;
pub mod status;
pub mod types;

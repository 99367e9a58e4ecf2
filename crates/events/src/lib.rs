//! Club event bus and persistence.
//!
//! Building blocks for the in-process domain event system:
//!
//! - [`EventBus`] -- publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ClubEvent`] -- the canonical domain event envelope.
//! - [`EventPersistence`] -- background service that durably writes every
//!   event to the `club_events` table.
//!
//! The settlement handler publishes here (`registration.activated`,
//! `player.rostered`, ...) so activity is observable without coupling the
//! webhook path to any consumer.

pub mod bus;
pub mod persistence;

pub use bus::{ClubEvent, EventBus};
pub use persistence::EventPersistence;

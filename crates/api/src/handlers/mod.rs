//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod billing;
pub mod coaches;
pub mod games;
pub mod players;
pub mod registrations;

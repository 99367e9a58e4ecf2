use std::sync::Arc;

use touchline_payments::BillingProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: touchline_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Payment-processor client. A trait object so integration tests can
    /// substitute a mock without touching the network.
    pub billing: Arc<dyn BillingProvider>,
    /// In-process event bus for publishing domain events.
    pub event_bus: Arc<touchline_events::EventBus>,
}

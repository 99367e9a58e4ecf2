pub mod auth;
pub mod billing;
pub mod coaches;
pub mod games;
pub mod health;
pub mod players;
pub mod registrations;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                        guardian signup (public)
/// /auth/login                           login (public)
/// /auth/refresh                         refresh (public)
/// /auth/logout                          logout (requires auth)
/// /auth/me                              own profile (requires auth)
///
/// /billing/checkout-session             create checkout session (public)
/// /billing/webhook                      processor settlement webhook (public, raw body)
///
/// /registrations                        list (staff), manual entry (admin)
/// /registrations/mine                   own submissions (guardian)
/// /registrations/{id}                   get (staff), edit (admin)
/// /registrations/{id}/approve           activate without payment (admin)
/// /registrations/{id}/coach             assign coach (admin)
/// /registrations/{id}/payment-status    override payment status (admin)
///
/// /players                              roster list (staff)
/// /players/mine                         own assigned players (coach)
/// /players/{id}                         get (staff), edit (admin)
/// /players/{id}/coach                   reassign coach (admin)
///
/// /coaches                              directory (auth)
/// /coaches/{user_id}/promote            promote user to coach (admin)
///
/// /games                                fixture list (auth), schedule (admin)
/// /games/{id}                           edit, delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/billing", billing::router())
        .nest("/registrations", registrations::router())
        .nest("/players", players::router())
        .nest("/coaches", coaches::router())
        .nest("/games", games::router())
}

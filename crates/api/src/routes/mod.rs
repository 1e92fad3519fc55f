pub mod admin;
pub mod auth;
pub mod calendar;
pub mod collaborations;
pub mod health;
pub mod newsletters;
pub mod proposals;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                        register creator account (public)
/// /auth/login                           login (public)
/// /auth/refresh                         refresh (public)
/// /auth/logout                          logout (requires auth)
///
/// /newsletters                          list, create (creator)
/// /newsletters/{id}                     get, update, delete (owner only)
/// /marketplace                          approved listings (any authed user)
///
/// /proposals                            creator inbox (GET), decide (PATCH)
///
/// /calendar                             creator's events (GET)
/// /calendar/{id}                        update event status (PATCH)
///
/// /collaborations                       creator's accepted placements (GET)
///
/// /admin/newsletters                    moderation listing (admin only)
/// /admin/newsletters/{id}/review        approve/reject (PATCH)
/// /admin/proposals                      list, create (admin only)
/// /admin/proposals/{id}                 get, update
/// /admin/collaborations                 all accepted placements (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(newsletters::router())
        .merge(proposals::router())
        .merge(calendar::router())
        .merge(collaborations::router())
        .nest("/admin", admin::router())
}

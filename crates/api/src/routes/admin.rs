//! Route definitions for the admin surface.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::{admin_newsletters, admin_proposals, collaborations};
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role via
/// the `RequireAdmin` extractor.
///
/// ```text
/// GET   /newsletters              -> moderation listing, ?status= filter
/// PATCH /newsletters/{id}/review  -> approve/reject a listing
/// GET   /proposals                -> list with target status counts
/// POST  /proposals                -> create proposal + pending targets
/// GET   /proposals/{id}           -> proposal with its targets
/// PATCH /proposals/{id}           -> field update + target diffing
/// GET   /collaborations           -> accepted placements, all creators
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/newsletters", get(admin_newsletters::list))
        .route(
            "/newsletters/{id}/review",
            patch(admin_newsletters::review),
        )
        .route(
            "/proposals",
            get(admin_proposals::list).post(admin_proposals::create),
        )
        .route(
            "/proposals/{id}",
            get(admin_proposals::get_by_id).patch(admin_proposals::update),
        )
        .route("/collaborations", get(collaborations::list_all))
}

//! Route definitions for newsletters and the marketplace.

use axum::routing::get;
use axum::Router;

use crate::handlers::newsletters;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET    /newsletters       -> list own listings (creator)
/// POST   /newsletters       -> create listing (creator)
/// GET    /newsletters/{id}  -> get own listing
/// PATCH  /newsletters/{id}  -> owner update (resets review status)
/// DELETE /newsletters/{id}  -> owner delete
/// GET    /marketplace       -> approved listings (any authed user)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/newsletters",
            get(newsletters::list).post(newsletters::create),
        )
        .route(
            "/newsletters/{id}",
            get(newsletters::get_by_id)
                .patch(newsletters::update)
                .delete(newsletters::delete),
        )
        .route("/marketplace", get(newsletters::marketplace))
}

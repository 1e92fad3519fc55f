//! Route definitions for accepted collaborations.

use axum::routing::get;
use axum::Router;

use crate::handlers::collaborations;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET /collaborations -> caller's accepted placements with derived status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/collaborations", get(collaborations::list))
}

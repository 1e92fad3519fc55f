//! Route definitions for the creator proposal workflow.

use axum::routing::get;
use axum::Router;

use crate::handlers::proposals;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET   /proposals -> creator inbox (join rows + proposal fields)
/// PATCH /proposals -> accept or reject one pending target
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/proposals", get(proposals::list).patch(proposals::decide))
}

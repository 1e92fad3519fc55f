//! Route definitions for the sponsorship calendar.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET   /calendar       -> caller's events, ?month=&year= filter
/// PATCH /calendar/{id}  -> update own event status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calendar", get(calendar::list))
        .route("/calendar/{id}", patch(calendar::update_status))
}

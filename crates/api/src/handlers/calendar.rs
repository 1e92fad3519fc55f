//! Handlers for the creator's sponsorship calendar.

use axum::extract::{Path, Query, State};
use axum::Json;
use frames_core::error::CoreError;
use frames_core::status::EventStatus;
use frames_core::types::DbId;
use frames_db::models::calendar_event::CalendarEvent;
use frames_db::repositories::CalendarEventRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireCreator;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the calendar listing.
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// Calendar month, 1-12.
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Request body for `PATCH /calendar/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub status: String,
}

/// GET /api/v1/calendar?month=&year=
///
/// List the caller's calendar events, optionally narrowed to one month.
pub async fn list(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<DataResponse<Vec<CalendarEvent>>>> {
    if let Some(month) = query.month {
        if !(1..=12).contains(&month) {
            return Err(AppError::Core(CoreError::Validation(
                "month must be between 1 and 12".into(),
            )));
        }
    }

    let events =
        CalendarEventRepo::list_for_user(&state.pool, user.user_id, query.month, query.year)
            .await?;
    Ok(Json(DataResponse { data: events }))
}

/// PATCH /api/v1/calendar/{id}
///
/// Update the status of one of the caller's events. The transition is
/// checked against the `EventStatus` machine; an event that exists but
/// belongs to someone else answers 404.
pub async fn update_status(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEventRequest>,
) -> AppResult<Json<DataResponse<CalendarEvent>>> {
    let requested = EventStatus::parse(&input.status)?;

    let event = CalendarEventRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|e| e.user_id == user.user_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CalendarEvent",
            id,
        }))?;

    let current = EventStatus::parse(&event.status)?;
    if !current.can_transition(requested) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot move event status from {} to {}",
            current.as_str(),
            requested.as_str()
        ))));
    }

    let updated = CalendarEventRepo::set_status(&state.pool, id, user.user_id, requested)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CalendarEvent",
            id,
        }))?;

    Ok(Json(DataResponse { data: updated }))
}

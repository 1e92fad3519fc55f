//! Calendar event model.

use chrono::NaiveDate;
use frames_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A calendar event row from the `calendar_events` table.
///
/// Created as a side effect of accepting a proposal target, in the same
/// transaction; exactly one exists per accepted (proposal, newsletter)
/// pair. `status` holds a [`frames_core::status::EventStatus`] value.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CalendarEvent {
    pub id: DbId,
    pub user_id: DbId,
    pub proposal_id: DbId,
    pub newsletter_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

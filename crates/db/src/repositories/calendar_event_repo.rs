//! Repository for the `calendar_events` table.
//!
//! Event creation happens inside the acceptance transaction in
//! [`ProposalTargetRepo::accept`](crate::repositories::ProposalTargetRepo::accept);
//! this repository covers the read and status-update paths.

use frames_core::status::EventStatus;
use frames_core::types::DbId;
use sqlx::PgPool;

use crate::models::calendar_event::CalendarEvent;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, proposal_id, newsletter_id, title, description, \
    event_date, status, created_at, updated_at";

/// Provides read and status-update operations for calendar events.
pub struct CalendarEventRepo;

impl CalendarEventRepo {
    /// Find an event by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM calendar_events WHERE id = $1");
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's events, optionally narrowed to one calendar month.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Vec<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events
             WHERE user_id = $1
               AND ($2::int IS NULL OR EXTRACT(MONTH FROM event_date) = $2)
               AND ($3::int IS NULL OR EXTRACT(YEAR FROM event_date) = $3)
             ORDER BY event_date"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(user_id)
            .bind(month.map(|m| m as i32))
            .bind(year)
            .fetch_all(pool)
            .await
    }

    /// List the events tied to a proposal/newsletter pair (at most one,
    /// by unique constraint).
    pub async fn find_for_placement(
        pool: &PgPool,
        proposal_id: DbId,
        newsletter_id: DbId,
    ) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events
             WHERE proposal_id = $1 AND newsletter_id = $2"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(proposal_id)
            .bind(newsletter_id)
            .fetch_optional(pool)
            .await
    }

    /// Set an event's status. Only matches the owner's rows; the caller
    /// validates the transition first.
    ///
    /// Returns `None` if no row matches the (id, owner) pair.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        status: EventStatus,
    ) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "UPDATE calendar_events SET status = $3, updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .bind(user_id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}

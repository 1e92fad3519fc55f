//! Repository for the `proposal_newsletters` join table.
//!
//! The accept/reject methods enforce the pending-state guard inside the
//! UPDATE itself (`... AND status = 'pending'`), so concurrent decisions
//! on the same row cannot both succeed, and acceptance inserts the
//! calendar event in the same transaction as the status flip.

use chrono::NaiveDate;
use frames_core::types::DbId;
use sqlx::PgPool;

use crate::models::calendar_event::CalendarEvent;
use crate::models::proposal_newsletter::{CollaborationRow, ProposalTarget, TargetWithProposal};

/// Column list for the `proposal_newsletters` table.
const COLUMNS: &str = "id, proposal_id, newsletter_id, status, selected_run_date, \
    decline_reason, responded_at, created_at";

/// Column list for the `calendar_events` table.
const EVENT_COLUMNS: &str = "id, user_id, proposal_id, newsletter_id, title, description, \
    event_date, status, created_at, updated_at";

/// Flattened join-row selection shared by the creator-facing queries.
const TARGET_WITH_PROPOSAL_SELECT: &str =
    "SELECT pn.id, pn.proposal_id, pn.newsletter_id, n.title AS newsletter_title,
            pn.status, pn.selected_run_date, pn.decline_reason, pn.responded_at,
            p.brand_name, p.sponsorship_type, p.campaign_start_date, p.campaign_end_date,
            p.product_type, p.ideal_target_audience, p.admin_copy_text, p.admin_brief_text,
            p.admin_assets_images, p.admin_tracking_links, pn.created_at
     FROM proposal_newsletters pn
     JOIN proposals p ON p.id = pn.proposal_id
     JOIN newsletters n ON n.id = pn.newsletter_id";

/// Provides operations on per-newsletter proposal decisions.
pub struct ProposalTargetRepo;

impl ProposalTargetRepo {
    /// List all join rows for newsletters owned by `user_id`, flattened
    /// with parent proposal fields (the creator's inbox).
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<TargetWithProposal>, sqlx::Error> {
        let query = format!("{TARGET_WITH_PROPOSAL_SELECT} WHERE n.user_id = $1 ORDER BY pn.created_at DESC");
        sqlx::query_as::<_, TargetWithProposal>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find a join row by id, but only if its newsletter belongs to
    /// `user_id`. Returns `None` both when the row does not exist and when
    /// it belongs to someone else, so callers can answer 404 without
    /// leaking existence.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<TargetWithProposal>, sqlx::Error> {
        let query = format!("{TARGET_WITH_PROPOSAL_SELECT} WHERE pn.id = $1 AND n.user_id = $2");
        sqlx::query_as::<_, TargetWithProposal>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List the join rows of a single proposal (admin detail view).
    pub async fn list_for_proposal(
        pool: &PgPool,
        proposal_id: DbId,
    ) -> Result<Vec<ProposalTarget>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposal_newsletters WHERE proposal_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, ProposalTarget>(&query)
            .bind(proposal_id)
            .fetch_all(pool)
            .await
    }

    /// Accept a pending join row and create its calendar event atomically.
    ///
    /// The UPDATE only matches while the row is still `pending` and its
    /// newsletter is owned by `user_id`; a second decision attempt (or a
    /// concurrent one) matches zero rows and yields `None`. The calendar
    /// event insert shares the transaction, so "event exists iff accepted"
    /// cannot drift.
    pub async fn accept(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        run_date: NaiveDate,
        event_title: &str,
        event_description: &str,
    ) -> Result<Option<(ProposalTarget, CalendarEvent)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE proposal_newsletters pn SET
                status = 'accepted',
                selected_run_date = $3,
                responded_at = NOW()
             FROM newsletters n
             WHERE pn.id = $1
               AND pn.status = 'pending'
               AND n.id = pn.newsletter_id
               AND n.user_id = $2
             RETURNING pn.id, pn.proposal_id, pn.newsletter_id, pn.status,
                       pn.selected_run_date, pn.decline_reason, pn.responded_at, pn.created_at"
        );
        let target = sqlx::query_as::<_, ProposalTarget>(&update_query)
            .bind(id)
            .bind(user_id)
            .bind(run_date)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(target) = target else {
            return Ok(None);
        };

        let event_query = format!(
            "INSERT INTO calendar_events
                (user_id, proposal_id, newsletter_id, title, description, event_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {EVENT_COLUMNS}"
        );
        let event = sqlx::query_as::<_, CalendarEvent>(&event_query)
            .bind(user_id)
            .bind(target.proposal_id)
            .bind(target.newsletter_id)
            .bind(event_title)
            .bind(event_description)
            .bind(run_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((target, event)))
    }

    /// Reject a pending join row, storing the decline reason.
    ///
    /// Same guard as [`accept`](ProposalTargetRepo::accept): only matches
    /// while pending and owned by `user_id`.
    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        decline_reason: &str,
    ) -> Result<Option<ProposalTarget>, sqlx::Error> {
        let query = "UPDATE proposal_newsletters pn SET
                status = 'rejected',
                decline_reason = $3,
                responded_at = NOW()
             FROM newsletters n
             WHERE pn.id = $1
               AND pn.status = 'pending'
               AND n.id = pn.newsletter_id
               AND n.user_id = $2
             RETURNING pn.id, pn.proposal_id, pn.newsletter_id, pn.status,
                       pn.selected_run_date, pn.decline_reason, pn.responded_at, pn.created_at";
        sqlx::query_as::<_, ProposalTarget>(query)
            .bind(id)
            .bind(user_id)
            .bind(decline_reason)
            .fetch_optional(pool)
            .await
    }

    /// List a creator's accepted placements joined with proposal,
    /// newsletter, and calendar event data.
    pub async fn list_accepted_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CollaborationRow>, sqlx::Error> {
        sqlx::query_as::<_, CollaborationRow>(
            "SELECT pn.id AS target_id, pn.proposal_id, pn.newsletter_id,
                    n.title AS newsletter_title, u.username AS owner_username,
                    p.brand_name, p.product_type, pn.selected_run_date,
                    p.campaign_end_date, ce.id AS calendar_event_id,
                    ce.status AS calendar_event_status
             FROM proposal_newsletters pn
             JOIN proposals p ON p.id = pn.proposal_id
             JOIN newsletters n ON n.id = pn.newsletter_id
             JOIN users u ON u.id = n.user_id
             LEFT JOIN calendar_events ce
               ON ce.proposal_id = pn.proposal_id AND ce.newsletter_id = pn.newsletter_id
             WHERE pn.status = 'accepted' AND n.user_id = $1
             ORDER BY pn.selected_run_date",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// List accepted placements across all creators (admin overview).
    pub async fn list_accepted_all(pool: &PgPool) -> Result<Vec<CollaborationRow>, sqlx::Error> {
        sqlx::query_as::<_, CollaborationRow>(
            "SELECT pn.id AS target_id, pn.proposal_id, pn.newsletter_id,
                    n.title AS newsletter_title, u.username AS owner_username,
                    p.brand_name, p.product_type, pn.selected_run_date,
                    p.campaign_end_date, ce.id AS calendar_event_id,
                    ce.status AS calendar_event_status
             FROM proposal_newsletters pn
             JOIN proposals p ON p.id = pn.proposal_id
             JOIN newsletters n ON n.id = pn.newsletter_id
             JOIN users u ON u.id = n.user_id
             LEFT JOIN calendar_events ce
               ON ce.proposal_id = pn.proposal_id AND ce.newsletter_id = pn.newsletter_id
             WHERE pn.status = 'accepted'
             ORDER BY pn.selected_run_date",
        )
        .fetch_all(pool)
        .await
    }
}

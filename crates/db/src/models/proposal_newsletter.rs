//! Proposal target (join row) model and read shapes.

use chrono::NaiveDate;
use frames_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A join row from the `proposal_newsletters` table.
///
/// One row per (proposal, newsletter) pairing. `status` is the only true
/// state machine in the system: `pending -> accepted | rejected`, terminal
/// once left pending.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProposalTarget {
    pub id: DbId,
    pub proposal_id: DbId,
    pub newsletter_id: DbId,
    pub status: String,
    pub selected_run_date: Option<NaiveDate>,
    pub decline_reason: Option<String>,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// A join row flattened with its parent proposal fields and newsletter
/// title (creator-facing inbox listing).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TargetWithProposal {
    pub id: DbId,
    pub proposal_id: DbId,
    pub newsletter_id: DbId,
    pub newsletter_title: String,
    pub status: String,
    pub selected_run_date: Option<NaiveDate>,
    pub decline_reason: Option<String>,
    pub responded_at: Option<Timestamp>,
    pub brand_name: String,
    pub sponsorship_type: String,
    pub campaign_start_date: NaiveDate,
    pub campaign_end_date: NaiveDate,
    pub product_type: String,
    pub ideal_target_audience: String,
    pub admin_copy_text: Option<String>,
    pub admin_brief_text: Option<String>,
    pub admin_assets_images: Option<Vec<String>>,
    pub admin_tracking_links: Option<Vec<String>>,
    pub created_at: Timestamp,
}

/// An accepted placement joined with proposal, newsletter, and calendar
/// event data. The display status is derived from the dates at read time
/// and attached by the handler, not stored here.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CollaborationRow {
    pub target_id: DbId,
    pub proposal_id: DbId,
    pub newsletter_id: DbId,
    pub newsletter_title: String,
    pub owner_username: String,
    pub brand_name: String,
    pub product_type: String,
    pub selected_run_date: NaiveDate,
    pub campaign_end_date: NaiveDate,
    pub calendar_event_id: Option<DbId>,
    pub calendar_event_status: Option<String>,
}

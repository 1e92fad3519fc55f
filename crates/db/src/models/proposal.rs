//! Sponsorship proposal model and DTOs.

use chrono::NaiveDate;
use frames_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A proposal row from the `proposals` table.
///
/// Authored only by admins; represents one brand campaign that targets one
/// or more newsletters through `proposal_newsletters` join rows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Proposal {
    pub id: DbId,
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
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A proposal with per-status target counts (admin listing).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProposalWithCounts {
    pub id: DbId,
    pub brand_name: String,
    pub sponsorship_type: String,
    pub campaign_start_date: NaiveDate,
    pub campaign_end_date: NaiveDate,
    pub product_type: String,
    pub created_at: Timestamp,
    pub target_count: i64,
    pub pending_count: i64,
    pub accepted_count: i64,
    pub rejected_count: i64,
}

/// DTO for creating a proposal together with its target newsletters.
#[derive(Debug, Deserialize)]
pub struct CreateProposal {
    pub brand_name: String,
    pub sponsorship_type: String,
    pub campaign_start_date: NaiveDate,
    pub campaign_end_date: NaiveDate,
    pub product_type: String,
    pub ideal_target_audience: String,
    pub target_newsletter_ids: Vec<DbId>,
    pub admin_copy_text: Option<String>,
    pub admin_brief_text: Option<String>,
    pub admin_assets_images: Option<Vec<String>>,
    pub admin_tracking_links: Option<Vec<String>>,
}

/// DTO for a partial proposal update. When `target_newsletter_ids` is
/// present the target set is diffed: missing pairs are added as pending,
/// pending pairs absent from the list are removed, decided pairs are left
/// alone.
#[derive(Debug, Deserialize)]
pub struct UpdateProposal {
    pub brand_name: Option<String>,
    pub sponsorship_type: Option<String>,
    pub campaign_start_date: Option<NaiveDate>,
    pub campaign_end_date: Option<NaiveDate>,
    pub product_type: Option<String>,
    pub ideal_target_audience: Option<String>,
    pub admin_copy_text: Option<String>,
    pub admin_brief_text: Option<String>,
    pub admin_assets_images: Option<Vec<String>>,
    pub admin_tracking_links: Option<Vec<String>>,
    pub target_newsletter_ids: Option<Vec<DbId>>,
}

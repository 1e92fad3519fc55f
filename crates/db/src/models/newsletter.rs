//! Newsletter listing model and DTOs.

use frames_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A newsletter row from the `newsletters` table.
///
/// `review_status` holds a [`frames_core::status::ReviewStatus`] value as
/// text; listings always start `in_review` and any owner edit puts them
/// back there.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Newsletter {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub audience_size: i32,
    pub open_rate: Option<f64>,
    pub click_rate: Option<f64>,
    pub sponsorship_price_cents: i64,
    pub cadence: Option<String>,
    pub review_status: String,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A newsletter joined with its owner's contact info (admin listing).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NewsletterWithOwner {
    pub id: DbId,
    pub user_id: DbId,
    pub owner_username: String,
    pub owner_email: String,
    pub title: String,
    pub category: Option<String>,
    pub audience_size: i32,
    pub open_rate: Option<f64>,
    pub click_rate: Option<f64>,
    pub sponsorship_price_cents: i64,
    pub review_status: String,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a newsletter. Review status is not accepted from the
/// client; the row always starts `in_review`.
#[derive(Debug, Deserialize)]
pub struct CreateNewsletter {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub audience_size: Option<i32>,
    pub open_rate: Option<f64>,
    pub click_rate: Option<f64>,
    pub sponsorship_price_cents: Option<i64>,
    pub cadence: Option<String>,
}

/// DTO for an owner edit. All fields optional; any edit resets the review
/// status to `in_review`.
#[derive(Debug, Deserialize)]
pub struct UpdateNewsletter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub audience_size: Option<i32>,
    pub open_rate: Option<f64>,
    pub click_rate: Option<f64>,
    pub sponsorship_price_cents: Option<i64>,
    pub cadence: Option<String>,
}

/// Owner contact info for proposal notification emails.
#[derive(Debug, Clone, FromRow)]
pub struct NewsletterContact {
    pub newsletter_id: DbId,
    pub newsletter_title: String,
    pub owner_user_id: DbId,
    pub owner_email: String,
}

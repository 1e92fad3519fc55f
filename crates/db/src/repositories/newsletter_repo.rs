//! Repository for the `newsletters` table.

use frames_core::status::ReviewStatus;
use frames_core::types::DbId;
use sqlx::PgPool;

use crate::models::newsletter::{
    CreateNewsletter, Newsletter, NewsletterContact, NewsletterWithOwner, UpdateNewsletter,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, description, category, audience_size, open_rate, \
    click_rate, sponsorship_price_cents, cadence, review_status, rejection_reason, \
    created_at, updated_at";

/// Provides CRUD operations for newsletter listings.
pub struct NewsletterRepo;

impl NewsletterRepo {
    /// Insert a new listing for the given owner. Always starts `in_review`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateNewsletter,
    ) -> Result<Newsletter, sqlx::Error> {
        let query = format!(
            "INSERT INTO newsletters
                (user_id, title, description, category, audience_size, open_rate,
                 click_rate, sponsorship_price_cents, cadence)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, $7, COALESCE($8, 0), $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Newsletter>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.audience_size)
            .bind(input.open_rate)
            .bind(input.click_rate)
            .bind(input.sponsorship_price_cents)
            .bind(&input.cadence)
            .fetch_one(pool)
            .await
    }

    /// Find a newsletter by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Newsletter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM newsletters WHERE id = $1");
        sqlx::query_as::<_, Newsletter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a creator's own newsletters, most recent first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Newsletter>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM newsletters WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Newsletter>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List approved newsletters for the marketplace.
    pub async fn list_approved(pool: &PgPool) -> Result<Vec<Newsletter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM newsletters
             WHERE review_status = 'approved'
             ORDER BY audience_size DESC, created_at DESC"
        );
        sqlx::query_as::<_, Newsletter>(&query).fetch_all(pool).await
    }

    /// List all newsletters with owner contact info (admin moderation view),
    /// optionally filtered by review status.
    pub async fn list_with_owners(
        pool: &PgPool,
        status: Option<ReviewStatus>,
    ) -> Result<Vec<NewsletterWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, NewsletterWithOwner>(
            "SELECT n.id, n.user_id, u.username AS owner_username, u.email AS owner_email,
                    n.title, n.category, n.audience_size, n.open_rate, n.click_rate,
                    n.sponsorship_price_cents, n.review_status, n.rejection_reason, n.created_at
             FROM newsletters n
             JOIN users u ON u.id = n.user_id
             WHERE $1::text IS NULL OR n.review_status = $1
             ORDER BY n.created_at DESC",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await
    }

    /// Apply an owner edit. Only non-`None` fields are changed, but the
    /// review status is ALWAYS reset to `in_review` and any previous
    /// rejection reason cleared, regardless of which fields changed.
    ///
    /// Returns `None` if no row matches the (id, owner) pair.
    pub async fn update_by_owner(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateNewsletter,
    ) -> Result<Option<Newsletter>, sqlx::Error> {
        let query = format!(
            "UPDATE newsletters SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                audience_size = COALESCE($6, audience_size),
                open_rate = COALESCE($7, open_rate),
                click_rate = COALESCE($8, click_rate),
                sponsorship_price_cents = COALESCE($9, sponsorship_price_cents),
                cadence = COALESCE($10, cadence),
                review_status = 'in_review',
                rejection_reason = NULL,
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Newsletter>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.audience_size)
            .bind(input.open_rate)
            .bind(input.click_rate)
            .bind(input.sponsorship_price_cents)
            .bind(&input.cadence)
            .fetch_optional(pool)
            .await
    }

    /// Set the review status (admin moderation). The caller validates the
    /// transition; this just writes the new state and reason.
    ///
    /// Returns `None` if the newsletter does not exist.
    pub async fn set_review_status(
        pool: &PgPool,
        id: DbId,
        status: ReviewStatus,
        rejection_reason: Option<&str>,
    ) -> Result<Option<Newsletter>, sqlx::Error> {
        let query = format!(
            "UPDATE newsletters SET
                review_status = $2,
                rejection_reason = $3,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Newsletter>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(rejection_reason)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete an owner's newsletter. Returns `true` if a row was deleted.
    pub async fn delete_by_owner(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM newsletters WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Resolve owner contact info for a set of newsletters (notification
    /// email fan-out).
    pub async fn owner_contacts(
        pool: &PgPool,
        newsletter_ids: &[DbId],
    ) -> Result<Vec<NewsletterContact>, sqlx::Error> {
        sqlx::query_as::<_, NewsletterContact>(
            "SELECT n.id AS newsletter_id, n.title AS newsletter_title,
                    u.id AS owner_user_id, u.email AS owner_email
             FROM newsletters n
             JOIN users u ON u.id = n.user_id
             WHERE n.id = ANY($1)",
        )
        .bind(newsletter_ids)
        .fetch_all(pool)
        .await
    }

    /// Count how many of the given ids actually exist (target validation).
    pub async fn count_existing(
        pool: &PgPool,
        newsletter_ids: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM newsletters WHERE id = ANY($1)")
            .bind(newsletter_ids)
            .fetch_one(pool)
            .await
    }
}

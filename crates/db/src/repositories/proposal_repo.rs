//! Repository for the `proposals` table.

use frames_core::types::DbId;
use sqlx::PgPool;

use crate::models::proposal::{CreateProposal, Proposal, ProposalWithCounts, UpdateProposal};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, brand_name, sponsorship_type, campaign_start_date, campaign_end_date, \
    product_type, ideal_target_audience, admin_copy_text, admin_brief_text, admin_assets_images, \
    admin_tracking_links, created_by, created_at, updated_at";

/// Provides CRUD operations for sponsorship proposals.
pub struct ProposalRepo;

impl ProposalRepo {
    /// Insert a proposal and one pending join row per target newsletter,
    /// all in a single transaction. Either everything lands or nothing
    /// does; there is no compensating delete path.
    pub async fn create_with_targets(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateProposal,
    ) -> Result<Proposal, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO proposals
                (brand_name, sponsorship_type, campaign_start_date, campaign_end_date,
                 product_type, ideal_target_audience, admin_copy_text, admin_brief_text,
                 admin_assets_images, admin_tracking_links, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let proposal = sqlx::query_as::<_, Proposal>(&insert_query)
            .bind(&input.brand_name)
            .bind(&input.sponsorship_type)
            .bind(input.campaign_start_date)
            .bind(input.campaign_end_date)
            .bind(&input.product_type)
            .bind(&input.ideal_target_audience)
            .bind(&input.admin_copy_text)
            .bind(&input.admin_brief_text)
            .bind(&input.admin_assets_images)
            .bind(&input.admin_tracking_links)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        for newsletter_id in &input.target_newsletter_ids {
            sqlx::query(
                "INSERT INTO proposal_newsletters (proposal_id, newsletter_id) VALUES ($1, $2)",
            )
            .bind(proposal.id)
            .bind(newsletter_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(proposal)
    }

    /// Find a proposal by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposals WHERE id = $1");
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all proposals with per-status target counts, most recent first.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<ProposalWithCounts>, sqlx::Error> {
        sqlx::query_as::<_, ProposalWithCounts>(
            "SELECT p.id, p.brand_name, p.sponsorship_type, p.campaign_start_date,
                    p.campaign_end_date, p.product_type, p.created_at,
                    COUNT(pn.id) AS target_count,
                    COUNT(pn.id) FILTER (WHERE pn.status = 'pending') AS pending_count,
                    COUNT(pn.id) FILTER (WHERE pn.status = 'accepted') AS accepted_count,
                    COUNT(pn.id) FILTER (WHERE pn.status = 'rejected') AS rejected_count
             FROM proposals p
             LEFT JOIN proposal_newsletters pn ON pn.proposal_id = p.id
             GROUP BY p.id
             ORDER BY p.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Apply a partial field update. Only non-`None` fields are changed;
    /// target diffing is handled separately by
    /// [`sync_targets`](ProposalRepo::sync_targets).
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProposal,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET
                brand_name = COALESCE($2, brand_name),
                sponsorship_type = COALESCE($3, sponsorship_type),
                campaign_start_date = COALESCE($4, campaign_start_date),
                campaign_end_date = COALESCE($5, campaign_end_date),
                product_type = COALESCE($6, product_type),
                ideal_target_audience = COALESCE($7, ideal_target_audience),
                admin_copy_text = COALESCE($8, admin_copy_text),
                admin_brief_text = COALESCE($9, admin_brief_text),
                admin_assets_images = COALESCE($10, admin_assets_images),
                admin_tracking_links = COALESCE($11, admin_tracking_links),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(&input.brand_name)
            .bind(&input.sponsorship_type)
            .bind(input.campaign_start_date)
            .bind(input.campaign_end_date)
            .bind(&input.product_type)
            .bind(&input.ideal_target_audience)
            .bind(&input.admin_copy_text)
            .bind(&input.admin_brief_text)
            .bind(&input.admin_assets_images)
            .bind(&input.admin_tracking_links)
            .fetch_optional(pool)
            .await
    }

    /// Diff the proposal's target set against `target_ids` in one
    /// transaction. Newsletters not yet targeted gain a pending join row;
    /// pending rows whose newsletter is absent from the list are removed.
    /// Accepted and rejected rows are history and are never touched.
    ///
    /// Returns `(added, removed)` newsletter ids.
    pub async fn sync_targets(
        pool: &PgPool,
        proposal_id: DbId,
        target_ids: &[DbId],
    ) -> Result<(Vec<DbId>, Vec<DbId>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let added: Vec<DbId> = sqlx::query_scalar(
            "INSERT INTO proposal_newsletters (proposal_id, newsletter_id)
             SELECT $1, unnest($2::bigint[])
             ON CONFLICT (proposal_id, newsletter_id) DO NOTHING
             RETURNING newsletter_id",
        )
        .bind(proposal_id)
        .bind(target_ids)
        .fetch_all(&mut *tx)
        .await?;

        let removed: Vec<DbId> = sqlx::query_scalar(
            "DELETE FROM proposal_newsletters
             WHERE proposal_id = $1
               AND status = 'pending'
               AND newsletter_id <> ALL($2)
             RETURNING newsletter_id",
        )
        .bind(proposal_id)
        .bind(target_ids)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((added, removed))
    }
}

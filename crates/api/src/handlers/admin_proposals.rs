//! Admin handlers for sponsorship proposals.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use frames_core::error::CoreError;
use frames_core::events::EVENT_PROPOSAL_CREATED;
use frames_core::types::DbId;
use frames_db::models::proposal::{CreateProposal, Proposal, ProposalWithCounts, UpdateProposal};
use frames_db::models::proposal_newsletter::ProposalTarget;
use frames_db::repositories::{NewsletterRepo, ProposalRepo, ProposalTargetRepo};
use frames_events::DomainEvent;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Created-proposal response: the row plus how many newsletters it targets.
#[derive(Debug, Serialize)]
pub struct CreatedProposal {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub target_count: usize,
}

/// Proposal detail: the row plus its per-newsletter join rows.
#[derive(Debug, Serialize)]
pub struct ProposalDetail {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub targets: Vec<ProposalTarget>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/proposals
///
/// Create a proposal targeting one or more newsletters. The proposal row
/// and its pending join rows are written in a single transaction, then a
/// `proposal.created` event is published; the mailer picks it up and
/// notifies each target owner.
pub async fn create(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProposal>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedProposal>>)> {
    validate_proposal_fields(&input)?;
    validate_targets_exist(&state, &input.target_newsletter_ids).await?;

    let proposal = ProposalRepo::create_with_targets(&state.pool, user.user_id, &input).await?;

    state.event_bus.publish(
        DomainEvent::new(EVENT_PROPOSAL_CREATED)
            .with_source("proposal", proposal.id)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({
                "sponsor_name": proposal.brand_name,
                "target_newsletter_ids": input.target_newsletter_ids,
            })),
    );

    let target_count = input.target_newsletter_ids.len();
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedProposal {
                proposal,
                target_count,
            },
        }),
    ))
}

/// GET /api/v1/admin/proposals
///
/// List all proposals with per-status target counts.
pub async fn list(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProposalWithCounts>>>> {
    let proposals = ProposalRepo::list_with_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: proposals }))
}

/// GET /api/v1/admin/proposals/{id}
///
/// Fetch a proposal together with its join rows.
pub async fn get_by_id(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProposalDetail>>> {
    let proposal = ProposalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Proposal",
            id,
        }))?;

    let targets = ProposalTargetRepo::list_for_proposal(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: ProposalDetail { proposal, targets },
    }))
}

/// PATCH /api/v1/admin/proposals/{id}
///
/// Partial field update plus target diffing. When `target_newsletter_ids`
/// is present, newsletters not yet targeted gain a pending join row and
/// still-pending rows absent from the list are removed. Accepted and
/// rejected rows are never removed by a diff.
pub async fn update(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProposal>,
) -> AppResult<Json<DataResponse<ProposalDetail>>> {
    if let (Some(start), Some(end)) = (input.campaign_start_date, input.campaign_end_date) {
        if start > end {
            return Err(AppError::Core(CoreError::Validation(
                "Campaign start date must not be after the end date".into(),
            )));
        }
    }

    if let Some(target_ids) = &input.target_newsletter_ids {
        if target_ids.is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "A proposal must target at least one newsletter".into(),
            )));
        }
        validate_targets_exist(&state, target_ids).await?;
    }

    let proposal = ProposalRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Proposal",
            id,
        }))?;

    if let Some(target_ids) = &input.target_newsletter_ids {
        let (added, removed) = ProposalRepo::sync_targets(&state.pool, id, target_ids).await?;
        tracing::info!(
            proposal_id = id,
            added = added.len(),
            removed = removed.len(),
            "proposal targets synced"
        );
    }

    let targets = ProposalTargetRepo::list_for_proposal(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: ProposalDetail { proposal, targets },
    }))
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Field-level validation for proposal creation.
fn validate_proposal_fields(input: &CreateProposal) -> AppResult<()> {
    let required = [
        ("brand_name", &input.brand_name),
        ("sponsorship_type", &input.sponsorship_type),
        ("product_type", &input.product_type),
        ("ideal_target_audience", &input.ideal_target_audience),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "{field} must not be empty"
            ))));
        }
    }

    if input.campaign_start_date > input.campaign_end_date {
        return Err(AppError::Core(CoreError::Validation(
            "Campaign start date must not be after the end date".into(),
        )));
    }

    if input.target_newsletter_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A proposal must target at least one newsletter".into(),
        )));
    }

    Ok(())
}

/// Reject the request if any of the given newsletter ids does not exist.
async fn validate_targets_exist(state: &AppState, target_ids: &[DbId]) -> AppResult<()> {
    let existing = NewsletterRepo::count_existing(&state.pool, target_ids).await?;
    if existing != target_ids.len() as i64 {
        return Err(AppError::Core(CoreError::Validation(
            "One or more target newsletters do not exist".into(),
        )));
    }
    Ok(())
}

//! Creator-facing proposal workflow: inbox listing and accept/reject.

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use frames_core::error::CoreError;
use frames_core::events::{EVENT_PROPOSAL_ACCEPTED, EVENT_PROPOSAL_REJECTED};
use frames_core::status::TargetStatus;
use frames_core::types::DbId;
use frames_db::models::calendar_event::CalendarEvent;
use frames_db::models::proposal_newsletter::{ProposalTarget, TargetWithProposal};
use frames_db::repositories::ProposalTargetRepo;
use frames_events::DomainEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireCreator;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// The two decisions a creator can make on a pending proposal.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    Accept,
    Reject,
}

/// Request body for `PATCH /proposals`.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub proposal_newsletter_id: DbId,
    pub action: DecisionAction,
    pub selected_run_date: Option<NaiveDate>,
    pub decline_reason: Option<String>,
}

/// Decision outcome: the updated join row, plus the calendar event when the
/// decision was an acceptance.
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub target: ProposalTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_event: Option<CalendarEvent>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/proposals
///
/// The caller's proposal inbox: every join row for their newsletters,
/// flattened with the parent proposal fields.
pub async fn list(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TargetWithProposal>>>> {
    let targets = ProposalTargetRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: targets }))
}

/// PATCH /api/v1/proposals
///
/// Decide a pending proposal target. The row must belong to a newsletter
/// the caller owns (404 otherwise, indistinguishable from a missing row)
/// and must still be pending (409 otherwise). Acceptance writes the
/// calendar event in the same transaction as the status flip, so a
/// concurrent decision can never yield an accepted row without its event.
pub async fn decide(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<Json<DataResponse<DecisionResponse>>> {
    let id = input.proposal_newsletter_id;

    let target = ProposalTargetRepo::find_for_owner(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Proposal",
            id,
        }))?;

    let current = TargetStatus::parse(&target.status)?;
    if current != TargetStatus::Pending {
        return Err(AppError::Core(CoreError::Conflict(
            "This proposal is no longer available".into(),
        )));
    }

    match input.action {
        DecisionAction::Accept => {
            let run_date = input.selected_run_date.ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "selected_run_date is required to accept a proposal".into(),
                ))
            })?;

            let event_title = format!("{} x {}", target.brand_name, target.newsletter_title);
            let event_description = format!(
                "{} sponsorship for {} ({})",
                target.sponsorship_type, target.brand_name, target.product_type
            );

            let accepted = ProposalTargetRepo::accept(
                &state.pool,
                id,
                user.user_id,
                run_date,
                &event_title,
                &event_description,
            )
            .await?;

            // The pending guard lives inside the UPDATE; a concurrent
            // decision that got there first makes this match zero rows.
            let (target, event) = accepted.ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "This proposal is no longer available".into(),
                ))
            })?;

            state.event_bus.publish(
                DomainEvent::new(EVENT_PROPOSAL_ACCEPTED)
                    .with_source("proposal", target.proposal_id)
                    .with_actor(user.user_id)
                    .with_payload(serde_json::json!({
                        "proposal_newsletter_id": target.id,
                        "newsletter_id": target.newsletter_id,
                        "selected_run_date": run_date,
                    })),
            );

            Ok(Json(DataResponse {
                data: DecisionResponse {
                    target,
                    calendar_event: Some(event),
                },
            }))
        }
        DecisionAction::Reject => {
            let reason = input
                .decline_reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(
                        "decline_reason is required to reject a proposal".into(),
                    ))
                })?;

            let rejected = ProposalTargetRepo::reject(&state.pool, id, user.user_id, reason)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Conflict(
                        "This proposal is no longer available".into(),
                    ))
                })?;

            state.event_bus.publish(
                DomainEvent::new(EVENT_PROPOSAL_REJECTED)
                    .with_source("proposal", rejected.proposal_id)
                    .with_actor(user.user_id)
                    .with_payload(serde_json::json!({
                        "proposal_newsletter_id": rejected.id,
                        "newsletter_id": rejected.newsletter_id,
                    })),
            );

            Ok(Json(DataResponse {
                data: DecisionResponse {
                    target: rejected,
                    calendar_event: None,
                },
            }))
        }
    }
}

//! Admin moderation handlers for newsletter listings.

use axum::extract::{Path, Query, State};
use axum::Json;
use frames_core::error::CoreError;
use frames_core::events::EVENT_NEWSLETTER_REVIEWED;
use frames_core::status::ReviewStatus;
use frames_core::types::DbId;
use frames_db::models::newsletter::{Newsletter, NewsletterWithOwner};
use frames_db::repositories::NewsletterRepo;
use frames_events::DomainEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the moderation listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Optional review status filter (`in_review`, `approved`, `rejected`).
    pub status: Option<String>,
}

/// Request body for `PATCH /admin/newsletters/{id}/review`.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub review_status: String,
    pub rejection_reason: Option<String>,
}

/// GET /api/v1/admin/newsletters
///
/// List all newsletters with owner contact info, optionally filtered by
/// review status.
pub async fn list(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<NewsletterWithOwner>>>> {
    let status = query
        .status
        .as_deref()
        .map(ReviewStatus::parse)
        .transpose()?;

    let newsletters = NewsletterRepo::list_with_owners(&state.pool, status).await?;
    Ok(Json(DataResponse { data: newsletters }))
}

/// PATCH /api/v1/admin/newsletters/{id}/review
///
/// Moderate a listing. The requested transition is checked against the
/// `ReviewStatus` machine; a rejection must carry a reason. Admin access is
/// enforced by the JWT role claim alone.
pub async fn review(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<Json<DataResponse<Newsletter>>> {
    let requested = ReviewStatus::parse(&input.review_status)?;

    let rejection_reason = match requested {
        ReviewStatus::Rejected => {
            let reason = input
                .rejection_reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(
                        "A rejection reason is required when rejecting".into(),
                    ))
                })?;
            Some(reason)
        }
        _ => None,
    };

    let newsletter = NewsletterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Newsletter",
            id,
        }))?;

    let current = ReviewStatus::parse(&newsletter.review_status)?;
    if !current.can_transition(requested) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot move review status from {} to {}",
            current.as_str(),
            requested.as_str()
        ))));
    }

    let updated = NewsletterRepo::set_review_status(&state.pool, id, requested, rejection_reason)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Newsletter",
            id,
        }))?;

    state.event_bus.publish(
        DomainEvent::new(EVENT_NEWSLETTER_REVIEWED)
            .with_source("newsletter", updated.id)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({ "review_status": requested.as_str() })),
    );

    Ok(Json(DataResponse { data: updated }))
}

//! Handlers for creator-owned newsletter listings and the marketplace.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use frames_core::error::CoreError;
use frames_core::events::EVENT_NEWSLETTER_SUBMITTED;
use frames_core::types::DbId;
use frames_db::models::newsletter::{CreateNewsletter, Newsletter, UpdateNewsletter};
use frames_db::repositories::NewsletterRepo;
use frames_events::DomainEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireCreator;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/newsletters
///
/// List the caller's own newsletters.
pub async fn list(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Newsletter>>>> {
    let newsletters = NewsletterRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: newsletters }))
}

/// POST /api/v1/newsletters
///
/// Create a listing for the caller. Review status always starts `in_review`;
/// the client cannot set it.
pub async fn create(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Json(input): Json<CreateNewsletter>,
) -> AppResult<(StatusCode, Json<DataResponse<Newsletter>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must not be empty".into(),
        )));
    }

    let newsletter = NewsletterRepo::create(&state.pool, user.user_id, &input).await?;

    state.event_bus.publish(
        DomainEvent::new(EVENT_NEWSLETTER_SUBMITTED)
            .with_source("newsletter", newsletter.id)
            .with_actor(user.user_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: newsletter })))
}

/// GET /api/v1/newsletters/{id}
///
/// Fetch one of the caller's own newsletters. Someone else's listing looks
/// exactly like a missing one: 404 either way.
pub async fn get_by_id(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Newsletter>>> {
    let newsletter = NewsletterRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|n| n.user_id == user.user_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Newsletter",
            id,
        }))?;
    Ok(Json(DataResponse { data: newsletter }))
}

/// PATCH /api/v1/newsletters/{id}
///
/// Owner partial update. Any edit resubmits the listing: review status is
/// reset to `in_review` and the rejection reason cleared, even when no field
/// actually changed.
pub async fn update(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNewsletter>,
) -> AppResult<Json<DataResponse<Newsletter>>> {
    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Title must not be empty".into(),
            )));
        }
    }

    let newsletter = NewsletterRepo::update_by_owner(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Newsletter",
            id,
        }))?;

    state.event_bus.publish(
        DomainEvent::new(EVENT_NEWSLETTER_SUBMITTED)
            .with_source("newsletter", newsletter.id)
            .with_actor(user.user_id),
    );

    Ok(Json(DataResponse { data: newsletter }))
}

/// DELETE /api/v1/newsletters/{id}
///
/// Owner hard delete. Returns 204 No Content.
pub async fn delete(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = NewsletterRepo::delete_by_owner(&state.pool, id, user.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Newsletter",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/marketplace
///
/// List approved newsletters. Available to any authenticated user.
pub async fn marketplace(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Newsletter>>>> {
    let newsletters = NewsletterRepo::list_approved(&state.pool).await?;
    Ok(Json(DataResponse { data: newsletters }))
}

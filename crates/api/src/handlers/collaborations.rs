//! Handlers for accepted collaborations (creator and admin views).

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use frames_core::status::CollaborationStatus;
use frames_db::models::proposal_newsletter::CollaborationRow;
use frames_db::repositories::ProposalTargetRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireCreator};
use crate::response::DataResponse;
use crate::state::AppState;

/// A collaboration row with its date-derived display status attached.
#[derive(Debug, Serialize)]
pub struct Collaboration {
    #[serde(flatten)]
    pub row: CollaborationRow,
    pub collaboration_status: CollaborationStatus,
}

/// GET /api/v1/collaborations
///
/// The caller's accepted placements, each with the derived status.
pub async fn list(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Collaboration>>>> {
    let rows = ProposalTargetRepo::list_accepted_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: with_derived_status(rows),
    }))
}

/// GET /api/v1/admin/collaborations
///
/// Accepted placements across all creators.
pub async fn list_all(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Collaboration>>>> {
    let rows = ProposalTargetRepo::list_accepted_all(&state.pool).await?;
    Ok(Json(DataResponse {
        data: with_derived_status(rows),
    }))
}

/// Attach the date-derived status to each row. Status is never persisted;
/// it is computed against today's date on every read.
fn with_derived_status(rows: Vec<CollaborationRow>) -> Vec<Collaboration> {
    let today = Utc::now().date_naive();
    rows.into_iter()
        .map(|row| {
            let collaboration_status =
                CollaborationStatus::derive(today, row.selected_run_date, row.campaign_end_date);
            Collaboration {
                row,
                collaboration_status,
            }
        })
        .collect()
}

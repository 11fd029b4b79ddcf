//! Handler for the dashboard summary.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use fleetcheck_core::metrics::{summarize, DashboardSummary};
use fleetcheck_core::signature::FinalizedInspection;
use fleetcheck_core::types::DbId;
use fleetcheck_db::repositories::{InspectionRepo, ProfileRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    /// Managers may narrow the summary to one inspector.
    pub inspector_id: Option<DbId>,
}

/// GET /api/v1/dashboard/summary
///
/// Computed over the caller's whole visible history. Calendar days follow
/// `DASHBOARD_UTC_OFFSET_MINUTES`.
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let rows =
        InspectionRepo::list_history(&state.pool, auth.visible_inspector(params.inspector_id))
            .await?;
    let history = rows
        .into_iter()
        .map(|row| row.into_finalized().map_err(AppError::from))
        .collect::<AppResult<Vec<FinalizedInspection>>>()?;

    let names: HashMap<DbId, String> = ProfileRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|p| (p.user_id, p.full_name))
        .collect();

    let data = summarize(&history, &names, Utc::now(), state.config.dashboard_offset());
    tracing::debug!(
        user_id = auth.user_id,
        total = data.total,
        streak = data.streak,
        "Dashboard summary computed"
    );
    Ok(Json(DataResponse { data }))
}

//! Handlers for the `/quality-reports` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use chrono::Utc;
use fleetcheck_core::quality_report::{
    FinalizedQualityReport, QualityReportForm, QualityReportSubmission,
};
use fleetcheck_core::report::render_quality_report;
use fleetcheck_core::signature::Signer;
use fleetcheck_core::types::DbId;
use fleetcheck_db::models::quality_report::QualityReportRow;
use fleetcheck_db::repositories::QualityReportRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::{current_inspector, load_visible};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::ensure_manager;
use crate::query::RecordListParams;
use crate::response::DataResponse;
use crate::sink::PgQualityReportSink;
use crate::state::AppState;

/// POST /api/v1/quality-reports
pub async fn create_quality_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<QualityReportSubmission>,
) -> AppResult<(StatusCode, Json<DataResponse<FinalizedQualityReport>>)> {
    let inspector = current_inspector(&state, &auth).await?;

    let mut form = QualityReportForm::new(input.draft)?;
    for (signer, image) in [
        (Signer::Inspector, input.inspector_signature),
        (Signer::Sealer, input.sealer_signature),
    ] {
        if let Some(image) = image.filter(|i| !i.trim().is_empty()) {
            form.set_signature(signer, image)?;
        }
    }

    let stored = form
        .submit(&PgQualityReportSink::new(&state.pool), &inspector, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: stored })))
}

/// GET /api/v1/quality-reports
pub async fn list_quality_reports(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RecordListParams>,
) -> AppResult<Json<DataResponse<Vec<FinalizedQualityReport>>>> {
    let page = params.pagination();
    let rows = QualityReportRepo::list(
        &state.pool,
        auth.visible_inspector(params.inspector_id),
        page.limit(),
        page.offset(),
    )
    .await?;
    let data = rows
        .into_iter()
        .map(|row| row.into_finalized().map_err(AppError::from))
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/quality-reports/{id}
pub async fn get_quality_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FinalizedQualityReport>>> {
    let row = load_report(&state, &auth, id).await?;
    Ok(Json(DataResponse {
        data: row.into_finalized()?,
    }))
}

/// DELETE /api/v1/quality-reports/{id}
pub async fn delete_quality_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let row = QualityReportRepo::find_by_id(&state.pool, id).await?;
    let row = load_visible(&auth, "QualityReport", id, row, |r| r.inspector_id)?;
    if row.inspector_id != auth.user_id {
        ensure_manager(&state.pool, auth.user_id).await?;
    }

    if !QualityReportRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("QualityReport", id));
    }
    tracing::info!(quality_report_id = id, user_id = auth.user_id, "Quality report deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/quality-reports/{id}/report
pub async fn quality_report_html(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Html<String>> {
    let record = load_report(&state, &auth, id).await?.into_finalized()?;
    Ok(Html(render_quality_report(&record)))
}

async fn load_report(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<QualityReportRow> {
    let row = QualityReportRepo::find_by_id(&state.pool, id).await?;
    load_visible(auth, "QualityReport", id, row, |r| r.inspector_id)
}

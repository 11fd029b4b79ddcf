//! Handlers for the `/inspections` resource.
//!
//! Submissions are replayed through an [`InspectionSession`] so the server
//! applies the same step rules as the capture screens, derives the status
//! itself, and stores the record only once both signatures are present.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use chrono::Utc;
use fleetcheck_core::checklist::catalog;
use fleetcheck_core::inspection::{InspectionSession, InspectionSubmission};
use fleetcheck_core::report::{render_inspection, render_inspection_log};
use fleetcheck_core::signature::{FinalizedInspection, SignatureGate, Signer};
use fleetcheck_core::types::DbId;
use fleetcheck_db::models::inspection::{InspectionFilter, InspectionRow};
use fleetcheck_db::repositories::InspectionRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::{current_inspector, load_visible};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::ensure_manager;
use crate::query::RecordListParams;
use crate::response::DataResponse;
use crate::sink::PgInspectionSink;
use crate::state::AppState;

/// POST /api/v1/inspections
///
/// Returns 201 with the stored record. Any step, metadata or signature
/// problem is a 400 and nothing is written.
pub async fn create_inspection(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<InspectionSubmission>,
) -> AppResult<(StatusCode, Json<DataResponse<FinalizedInspection>>)> {
    let inspector = current_inspector(&state, &auth).await?;

    let session = InspectionSession::replay(catalog(), input.meta, &input.responses)?;
    let mut gate = SignatureGate::new(session.complete()?);
    set_if_present(&mut gate, Signer::Driver, input.driver_signature)?;
    set_if_present(&mut gate, Signer::Inspector, input.inspector_signature)?;

    let stored = gate
        .submit(&PgInspectionSink::new(&state.pool), &inspector, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: stored })))
}

/// GET /api/v1/inspections
///
/// Newest first. Inspectors only ever see their own records; managers may
/// filter by `inspector_id` or see everything.
pub async fn list_inspections(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RecordListParams>,
) -> AppResult<Json<DataResponse<Vec<FinalizedInspection>>>> {
    let records = fetch_page(&state, &auth, &params).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/inspections/{id}
pub async fn get_inspection(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FinalizedInspection>>> {
    let row = load_inspection(&state, &auth, id).await?;
    Ok(Json(DataResponse {
        data: row.into_finalized()?,
    }))
}

/// DELETE /api/v1/inspections/{id}
///
/// Allowed for the inspector who filed it or a manager.
pub async fn delete_inspection(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let row = InspectionRepo::find_by_id(&state.pool, id).await?;
    let row = load_visible(&auth, "Inspection", id, row, |r| r.inspector_id)?;
    if row.inspector_id != auth.user_id {
        ensure_manager(&state.pool, auth.user_id).await?;
    }

    if !InspectionRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Inspection", id));
    }
    tracing::info!(inspection_id = id, user_id = auth.user_id, "Inspection deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/inspections/{id}/report
pub async fn inspection_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Html<String>> {
    let record = load_inspection(&state, &auth, id).await?.into_finalized()?;
    Ok(Html(render_inspection(&record)))
}

/// GET /api/v1/inspections/report
///
/// Printable log; takes the same filters and paging as the list.
pub async fn inspection_log_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RecordListParams>,
) -> AppResult<Html<String>> {
    let records = fetch_page(&state, &auth, &params).await?;
    Ok(Html(render_inspection_log(&records)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Blank or absent signatures leave the slot empty, so finalize reports
/// "Signatures Required".
fn set_if_present(
    gate: &mut SignatureGate,
    signer: Signer,
    image: Option<String>,
) -> Result<(), AppError> {
    match image {
        Some(image) if !image.trim().is_empty() => Ok(gate.set_signature(signer, image)?),
        _ => Ok(()),
    }
}

async fn fetch_page(
    state: &AppState,
    auth: &AuthUser,
    params: &RecordListParams,
) -> AppResult<Vec<FinalizedInspection>> {
    let page = params.pagination();
    let filter = InspectionFilter {
        inspector_id: auth.visible_inspector(params.inspector_id),
        limit: page.limit(),
        offset: page.offset(),
    };
    InspectionRepo::list(&state.pool, &filter)
        .await?
        .into_iter()
        .map(|row| row.into_finalized().map_err(AppError::from))
        .collect()
}

async fn load_inspection(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<InspectionRow> {
    let row = InspectionRepo::find_by_id(&state.pool, id).await?;
    load_visible(auth, "Inspection", id, row, |r| r.inspector_id)
}

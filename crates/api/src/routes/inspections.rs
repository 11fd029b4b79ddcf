//! Route definitions for the `/inspections` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::inspections;
use crate::state::AppState;

/// Routes mounted at `/inspections`.
///
/// ```text
/// GET    /             -> list_inspections
/// POST   /             -> create_inspection
/// GET    /report       -> inspection_log_report
/// GET    /{id}         -> get_inspection
/// DELETE /{id}         -> delete_inspection
/// GET    /{id}/report  -> inspection_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(inspections::list_inspections).post(inspections::create_inspection),
        )
        .route("/report", get(inspections::inspection_log_report))
        .route(
            "/{id}",
            get(inspections::get_inspection).delete(inspections::delete_inspection),
        )
        .route("/{id}/report", get(inspections::inspection_report))
}

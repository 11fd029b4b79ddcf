//! Route definitions for the `/quality-reports` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::quality_reports;
use crate::state::AppState;

/// Routes mounted at `/quality-reports`.
///
/// ```text
/// GET    /             -> list_quality_reports
/// POST   /             -> create_quality_report
/// GET    /{id}         -> get_quality_report
/// DELETE /{id}         -> delete_quality_report
/// GET    /{id}/report  -> quality_report_html
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(quality_reports::list_quality_reports)
                .post(quality_reports::create_quality_report),
        )
        .route(
            "/{id}",
            get(quality_reports::get_quality_report)
                .delete(quality_reports::delete_quality_report),
        )
        .route("/{id}/report", get(quality_reports::quality_report_html))
}

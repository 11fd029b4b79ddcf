pub mod admin;
pub mod auth;
pub mod checklist;
pub mod dashboard;
pub mod health;
pub mod inspections;
pub mod profile;
pub mod quality_reports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/sign-up, /auth/sign-in, /auth/refresh       public
/// /auth/reset-password, /auth/verify-code           public
/// /auth/sign-out, /auth/update-password             authenticated
///
/// /checklist                                        catalog
///
/// /inspections                                      list, create
/// /inspections/report                               printable log (HTML)
/// /inspections/{id}                                 get, delete
/// /inspections/{id}/report                          printable record (HTML)
///
/// /quality-reports                                  list, create
/// /quality-reports/{id}                             get, delete
/// /quality-reports/{id}/report                      printable report (HTML)
///
/// /profile                                          own profile get, update
/// /profiles                                         list (manager)
/// /profiles/{user_id}                               get (self or manager)
///
/// /dashboard/summary                                metrics
///
/// /admin/users                                      list, create (manager)
/// /admin/users/{user_id}                            delete (manager)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/checklist", checklist::router())
        .nest("/inspections", inspections::router())
        .nest("/quality-reports", quality_reports::router())
        .merge(profile::router())
        .nest("/dashboard", dashboard::router())
        .nest("/admin", admin::router())
}

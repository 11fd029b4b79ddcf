//! Request handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod checklist;
pub mod dashboard;
pub mod inspections;
pub mod profile;
pub mod quality_reports;

use fleetcheck_core::signature::Inspector;
use fleetcheck_core::types::DbId;
use fleetcheck_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// The identity stamped on records the caller files. The name comes from
/// the stored profile, never from the request body.
pub(crate) async fn current_inspector(state: &AppState, auth: &AuthUser) -> AppResult<Inspector> {
    let profile = ProfileRepo::find_by_user_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile", auth.user_id))?;
    Ok(Inspector {
        id: profile.user_id,
        name: profile.full_name,
    })
}

/// Apply read visibility to a fetched row. Records filed by someone else
/// are reported as missing to non-managers.
pub(crate) fn load_visible<R>(
    auth: &AuthUser,
    entity: &'static str,
    id: DbId,
    row: Option<R>,
    owner: impl Fn(&R) -> DbId,
) -> AppResult<R> {
    match row {
        Some(r) if auth.is_manager() || owner(&r) == auth.user_id => Ok(r),
        _ => Err(AppError::not_found(entity, id)),
    }
}

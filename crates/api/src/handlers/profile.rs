//! Handlers for profiles: the caller's own (`/profile`) and lookups
//! (`/profiles`).

use axum::extract::{Path, State};
use axum::Json;
use fleetcheck_core::error::CoreError;
use fleetcheck_core::types::DbId;
use fleetcheck_db::models::profile::{Profile, UpdateProfile};
use fleetcheck_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{ensure_manager, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn get_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = find_profile(&state, auth.user_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/profile
///
/// Only `full_name`, `username` and `staff_id` are editable; the role
/// field is not part of the body.
pub async fn update_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let input = UpdateProfile {
        full_name: trimmed(input.full_name),
        username: trimmed(input.username),
        staff_id: trimmed(input.staff_id),
    };
    if input.full_name.as_deref() == Some("") {
        return Err(AppError::Core(CoreError::Validation(
            "Full name cannot be blank".into(),
        )));
    }

    let profile = ProfileRepo::update(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Profile", auth.user_id))?;
    tracing::info!(user_id = auth.user_id, "Profile updated");
    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/profiles/{user_id}
///
/// Your own profile, or anyone's if you are a manager.
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Profile>>> {
    if user_id != auth.user_id {
        ensure_manager(&state.pool, auth.user_id).await?;
    }
    let profile = find_profile(&state, user_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/profiles
pub async fn list_profiles(
    State(state): State<AppState>,
    RequireManager(_manager): RequireManager,
) -> AppResult<Json<DataResponse<Vec<Profile>>>> {
    let profiles = ProfileRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: profiles }))
}

async fn find_profile(state: &AppState, user_id: DbId) -> AppResult<Profile> {
    ProfileRepo::find_by_user_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile", user_id))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

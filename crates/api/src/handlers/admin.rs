//! Handlers for the `/admin` resource (user management).
//!
//! Every handler takes [`RequireManager`], which checks the caller's stored
//! profile before the handler body runs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fleetcheck_core::error::CoreError;
use fleetcheck_core::roles::validate_role;
use fleetcheck_core::types::DbId;
use fleetcheck_db::models::profile::Profile;
use fleetcheck_db::models::user::CreateAccount;
use fleetcheck_db::repositories::{ProfileRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    pub role: String,
    pub username: Option<String>,
    pub staff_id: Option<String>,
}

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Profile>>)> {
    input.validate()?;
    validate_role(&input.role)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let (user, profile) = UserRepo::create_with_profile(
        &state.pool,
        &CreateAccount {
            email: input.email.trim().to_lowercase(),
            password_hash,
            full_name: input.full_name.trim().to_string(),
            role: input.role,
            username: input.username.filter(|u| !u.trim().is_empty()),
            staff_id: input.staff_id.filter(|s| !s.trim().is_empty()),
        },
    )
    .await?;
    tracing::info!(
        user_id = user.id,
        role = %profile.role,
        created_by = manager.user_id,
        "User created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: profile })))
}

/// DELETE /api/v1/admin/users/{user_id}
///
/// Removes the user and everything they filed. Deleting yourself is a 400.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Path(user_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if user_id == manager.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot delete your own account".into(),
        )));
    }

    if !UserRepo::delete_with_records(&state.pool, user_id).await? {
        return Err(AppError::not_found("User", user_id));
    }
    tracing::info!(user_id, deleted_by = manager.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireManager(_manager): RequireManager,
) -> AppResult<Json<DataResponse<Vec<Profile>>>> {
    let profiles = ProfileRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: profiles }))
}

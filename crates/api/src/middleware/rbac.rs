//! Role-based access control extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fleetcheck_core::error::CoreError;
use fleetcheck_core::roles::ROLE_MANAGER;
use fleetcheck_core::types::DbId;
use fleetcheck_db::models::profile::Profile;
use fleetcheck_db::repositories::ProfileRepo;
use fleetcheck_db::DbPool;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the caller's *stored* profile role to be `manager`.
///
/// The token role is not enough: a manager demoted after sign-in still holds
/// a token claiming `manager` until it expires. The check runs before the
/// handler body, so a rejected request performs no writes.
///
/// ```ignore
/// async fn delete_user(RequireManager(caller): RequireManager) -> AppResult<StatusCode> {
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let profile = ensure_manager(&state.pool, user.user_id).await?;
        Ok(RequireManager(AuthUser {
            user_id: user.user_id,
            role: profile.role,
            session_id: user.session_id,
        }))
    }
}

/// Load `user_id`'s profile and fail with 403 unless its role is `manager`.
pub async fn ensure_manager(pool: &DbPool, user_id: DbId) -> Result<Profile, AppError> {
    match ProfileRepo::find_by_user_id(pool, user_id).await? {
        Some(profile) if profile.role == ROLE_MANAGER => Ok(profile),
        _ => {
            tracing::warn!(user_id, "Manager-only request rejected");
            Err(AppError::Core(CoreError::Forbidden(
                "Manager role required".into(),
            )))
        }
    }
}

/// Any authenticated user. Same as [`AuthUser`], named for route tables.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

//! Bearer token extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fleetcheck_core::error::CoreError;
use fleetcheck_core::roles::ROLE_MANAGER;
use fleetcheck_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller, as stated by a valid access token.
///
/// `role` is the role at token issue time. Anything that must not trust a
/// stale role goes through [`RequireManager`](super::rbac::RequireManager).
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
    /// Session the access token was issued with.
    pub session_id: DbId,
}

impl AuthUser {
    pub fn is_manager(&self) -> bool {
        self.role == ROLE_MANAGER
    }

    /// Managers see everyone's records; inspectors only their own.
    pub fn visible_inspector(&self, requested: Option<DbId>) -> Option<DbId> {
        if self.is_manager() {
            requested
        } else {
            Some(self.user_id)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            session_id: claims.sid,
        })
    }
}

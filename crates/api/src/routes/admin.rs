//! Route definitions for the `/admin` resource. All routes are manager-only.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users             -> list_users
/// POST   /users             -> create_user
/// DELETE /users/{user_id}   -> delete_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route("/users/{user_id}", delete(admin::delete_user))
}

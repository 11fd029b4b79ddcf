use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Profile routes, merged directly into `/api/v1`.
///
/// ```text
/// GET /profile              -> get_own_profile
/// PUT /profile              -> update_own_profile
/// GET /profiles             -> list_profiles (manager)
/// GET /profiles/{user_id}   -> get_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(profile::get_own_profile).put(profile::update_own_profile),
        )
        .route("/profiles", get(profile::list_profiles))
        .route("/profiles/{user_id}", get(profile::get_profile))
}

//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /sign-up          -> sign_up
/// POST /sign-in          -> sign_in
/// POST /refresh          -> refresh
/// POST /sign-out         -> sign_out (requires auth)
/// POST /reset-password   -> reset_password
/// POST /verify-code      -> verify_code
/// POST /update-password  -> update_password (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
        .route("/refresh", post(auth::refresh))
        .route("/sign-out", post(auth::sign_out))
        .route("/reset-password", post(auth::reset_password))
        .route("/verify-code", post(auth::verify_code))
        .route("/update-password", post(auth::update_password))
}

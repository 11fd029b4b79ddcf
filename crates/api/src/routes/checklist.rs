use axum::routing::get;
use axum::Router;

use crate::handlers::checklist;
use crate::state::AppState;

/// Routes mounted at `/checklist`.
///
/// ```text
/// GET /  -> list_items
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(checklist::list_items))
}

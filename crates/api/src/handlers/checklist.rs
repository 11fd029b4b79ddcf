//! Handler for the read-only checklist catalog.

use axum::Json;
use fleetcheck_core::checklist::{catalog, ChecklistItem};

use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;

/// GET /api/v1/checklist
///
/// Items in the order an inspection walks them.
pub async fn list_items(RequireAuth(_user): RequireAuth) -> Json<DataResponse<Vec<ChecklistItem>>> {
    Json(DataResponse { data: catalog() })
}

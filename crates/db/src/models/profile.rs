//! User profile model and DTOs.

use fleetcheck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `profiles` table.
///
/// Serializes to the public profile shape: `id` and `created_at` stay
/// internal.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Profile {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub user_id: DbId,
    pub full_name: String,
    pub role: String,
    pub username: Option<String>,
    pub staff_id: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub user_id: DbId,
    pub full_name: String,
    pub role: String,
    pub username: Option<String>,
    pub staff_id: Option<String>,
}

/// Self-service profile edits. The role is intentionally absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub staff_id: Option<String>,
}

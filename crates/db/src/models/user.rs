//! Auth identity model.

use fleetcheck_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full row from the `users` table.
///
/// Carries the password hash, so it is never serialized. API responses use
/// the matching [`Profile`](crate::models::profile::Profile) instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user. `email` is expected to be normalised.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
}

/// A new identity plus its profile, created together.
#[derive(Debug)]
pub struct CreateAccount {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub username: Option<String>,
    pub staff_id: Option<String>,
}

//! Password reset code model.

use fleetcheck_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `password_reset_codes` table. Only the hash is kept.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetCode {
    pub id: DbId,
    pub user_id: DbId,
    pub code_hash: String,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    /// Verification attempts made against this code so far.
    pub attempts: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

pub struct CreateResetCode {
    pub user_id: DbId,
    pub code_hash: String,
    pub expires_at: Timestamp,
}

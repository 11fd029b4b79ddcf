//! Repository for the `password_reset_codes` table.

use fleetcheck_core::types::DbId;
use sqlx::PgPool;

use crate::models::reset_code::{CreateResetCode, PasswordResetCode};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, code_hash, expires_at, used_at, attempts, created_at, updated_at";

pub struct ResetCodeRepo;

impl ResetCodeRepo {
    /// Store a new code, first retiring any earlier unused codes for the
    /// same user so only the latest one is valid.
    pub async fn replace(
        pool: &PgPool,
        input: &CreateResetCode,
    ) -> Result<PasswordResetCode, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let retired = sqlx::query(
            "UPDATE password_reset_codes SET used_at = NOW()
             WHERE user_id = $1 AND used_at IS NULL",
        )
        .bind(input.user_id)
        .execute(&mut *tx)
        .await?;
        if retired.rows_affected() > 0 {
            tracing::debug!(
                user_id = input.user_id,
                retired = retired.rows_affected(),
                "Earlier reset codes retired"
            );
        }

        let query = format!(
            "INSERT INTO password_reset_codes (user_id, code_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PasswordResetCode>(&query)
            .bind(input.user_id)
            .bind(&input.code_hash)
            .bind(input.expires_at)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Spend one verification attempt on the user's live code and return it
    /// with the updated count.
    ///
    /// `None` when there is no unused, unexpired code with fewer than
    /// `max_attempts` attempts. The increment happens under the row lock, so
    /// no more than `max_attempts` calls ever see the code, however many run
    /// at once.
    pub async fn claim_attempt(
        pool: &PgPool,
        user_id: DbId,
        max_attempts: i32,
    ) -> Result<Option<PasswordResetCode>, sqlx::Error> {
        let query = format!(
            "UPDATE password_reset_codes SET attempts = attempts + 1
             WHERE id = (
                 SELECT id FROM password_reset_codes
                 WHERE user_id = $1
                   AND used_at IS NULL
                   AND expires_at > NOW()
                 ORDER BY created_at DESC, id DESC
                 LIMIT 1
             )
               AND used_at IS NULL
               AND attempts < $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PasswordResetCode>(&query)
            .bind(user_id)
            .bind(max_attempts)
            .fetch_optional(pool)
            .await
    }

    /// Consume a code. Returns `false` if it was already used.
    pub async fn mark_used(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE password_reset_codes SET used_at = NOW() WHERE id = $1 AND used_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

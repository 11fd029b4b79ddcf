//! Repository for the `inspections` table.

use fleetcheck_core::signature::FinalizedInspection;
use fleetcheck_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::inspection::{InspectionFilter, InspectionRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, inspector_id, inspector_name, driver_name, truck_number, transporter, \
                       depot, status, issue_count, items, driver_signature, inspector_signature, \
                       created_at, updated_at";

/// Provides insert/read/delete for finalized inspections. Rows are never
/// updated.
pub struct InspectionRepo;

impl InspectionRepo {
    /// Insert a finalized inspection, returning the stored row.
    ///
    /// `created_at` is taken from the record (the finalize time), not `NOW()`.
    pub async fn insert(
        pool: &PgPool,
        record: &FinalizedInspection,
    ) -> Result<InspectionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO inspections
                (inspector_id, inspector_name, driver_name, truck_number, transporter, depot,
                 status, issue_count, items, driver_signature, inspector_signature, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InspectionRow>(&query)
            .bind(record.inspector_id)
            .bind(&record.inspector_name)
            .bind(&record.meta.driver_name)
            .bind(&record.meta.truck_number)
            .bind(&record.meta.transporter)
            .bind(&record.meta.depot)
            .bind(record.status.as_str())
            .bind(record.issue_count as i32)
            .bind(Json(&record.responses))
            .bind(&record.driver_signature)
            .bind(&record.inspector_signature)
            .bind(record.created_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<InspectionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inspections WHERE id = $1");
        sqlx::query_as::<_, InspectionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Newest first, optionally restricted to one inspector.
    pub async fn list(
        pool: &PgPool,
        filter: &InspectionFilter,
    ) -> Result<Vec<InspectionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspections
             WHERE ($1::BIGINT IS NULL OR inspector_id = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, InspectionRow>(&query)
            .bind(filter.inspector_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Every inspection visible to the caller, newest first. Used by the
    /// dashboard, which needs the whole history for streaks.
    pub async fn list_history(
        pool: &PgPool,
        inspector_id: Option<DbId>,
    ) -> Result<Vec<InspectionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspections
             WHERE ($1::BIGINT IS NULL OR inspector_id = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, InspectionRow>(&query)
            .bind(inspector_id)
            .fetch_all(pool)
            .await
    }

    /// Hard-delete an inspection. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inspections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

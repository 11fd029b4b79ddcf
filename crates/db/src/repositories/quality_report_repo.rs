//! Repository for the `quality_reports` table.

use fleetcheck_core::quality_report::FinalizedQualityReport;
use fleetcheck_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::quality_report::QualityReportRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, inspector_id, inspector_name, company_name, truck_number, product, \
                       depot, compartments, quality_params, sealer_name, inspector_signature, \
                       sealer_signature, created_at, updated_at";

pub struct QualityReportRepo;

impl QualityReportRepo {
    pub async fn insert(
        pool: &PgPool,
        record: &FinalizedQualityReport,
    ) -> Result<QualityReportRow, sqlx::Error> {
        let d = &record.draft;
        let query = format!(
            "INSERT INTO quality_reports
                (inspector_id, inspector_name, company_name, truck_number, product, depot,
                 compartments, quality_params, sealer_name, inspector_signature,
                 sealer_signature, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QualityReportRow>(&query)
            .bind(record.inspector_id)
            .bind(&record.inspector_name)
            .bind(&d.company_name)
            .bind(&d.truck_number)
            .bind(&d.product)
            .bind(&d.depot)
            .bind(Json(&d.compartments))
            .bind(Json(&d.quality_params))
            .bind(&d.sealer_name)
            .bind(&record.inspector_signature)
            .bind(&record.sealer_signature)
            .bind(record.created_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<QualityReportRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quality_reports WHERE id = $1");
        sqlx::query_as::<_, QualityReportRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Newest first, optionally restricted to one inspector.
    pub async fn list(
        pool: &PgPool,
        inspector_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QualityReportRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quality_reports
             WHERE ($1::BIGINT IS NULL OR inspector_id = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, QualityReportRow>(&query)
            .bind(inspector_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quality_reports WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! PostgreSQL-backed [`RecordSink`]s.
//!
//! The signature gate and the quality report form hand finished records to
//! these; each insert is a single statement, so nothing is written unless the
//! record is complete and dual-signed.

use fleetcheck_core::quality_report::FinalizedQualityReport;
use fleetcheck_core::signature::{FinalizedInspection, RecordSink};
use fleetcheck_db::repositories::{InspectionRepo, QualityReportRepo};
use fleetcheck_db::DbPool;

use crate::error::AppError;

pub struct PgInspectionSink<'a> {
    pool: &'a DbPool,
}

impl<'a> PgInspectionSink<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }
}

impl RecordSink<FinalizedInspection> for PgInspectionSink<'_> {
    type Stored = FinalizedInspection;
    type Error = AppError;

    async fn insert(&self, record: &FinalizedInspection) -> Result<Self::Stored, Self::Error> {
        let row = InspectionRepo::insert(self.pool, record).await?;
        tracing::info!(
            inspection_id = row.id,
            inspector_id = row.inspector_id,
            status = %row.status,
            issue_count = row.issue_count,
            "Inspection stored"
        );
        Ok(row.into_finalized()?)
    }
}

pub struct PgQualityReportSink<'a> {
    pool: &'a DbPool,
}

impl<'a> PgQualityReportSink<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }
}

impl RecordSink<FinalizedQualityReport> for PgQualityReportSink<'_> {
    type Stored = FinalizedQualityReport;
    type Error = AppError;

    async fn insert(&self, record: &FinalizedQualityReport) -> Result<Self::Stored, Self::Error> {
        let row = QualityReportRepo::insert(self.pool, record).await?;
        tracing::info!(
            quality_report_id = row.id,
            inspector_id = row.inspector_id,
            "Quality report stored"
        );
        Ok(row.into_finalized()?)
    }
}

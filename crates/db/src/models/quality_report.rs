//! Quality report row model.

use fleetcheck_core::error::CoreError;
use fleetcheck_core::quality_report::{
    Compartment, FinalizedQualityReport, QualityParams, QualityReportDraft,
};
use fleetcheck_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `quality_reports` table.
#[derive(Debug, Clone, FromRow)]
pub struct QualityReportRow {
    pub id: DbId,
    pub inspector_id: DbId,
    pub inspector_name: String,
    pub company_name: String,
    pub truck_number: String,
    pub product: String,
    pub depot: String,
    pub compartments: serde_json::Value,
    pub quality_params: serde_json::Value,
    pub sealer_name: String,
    pub inspector_signature: String,
    pub sealer_signature: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl QualityReportRow {
    pub fn into_finalized(self) -> Result<FinalizedQualityReport, CoreError> {
        let id = self.id;
        let malformed = |what: &str, e: serde_json::Error| {
            CoreError::Internal(format!("Quality report {id} has malformed {what}: {e}"))
        };
        let compartments: Vec<Compartment> = serde_json::from_value(self.compartments)
            .map_err(|e| malformed("compartments", e))?;
        let quality_params: QualityParams = serde_json::from_value(self.quality_params)
            .map_err(|e| malformed("quality_params", e))?;
        Ok(FinalizedQualityReport {
            id: Some(id),
            inspector_id: self.inspector_id,
            inspector_name: self.inspector_name,
            draft: QualityReportDraft {
                company_name: self.company_name,
                truck_number: self.truck_number,
                product: self.product,
                depot: self.depot,
                compartments,
                quality_params,
                sealer_name: self.sealer_name,
            },
            inspector_signature: self.inspector_signature,
            sealer_signature: self.sealer_signature,
            created_at: self.created_at,
        })
    }
}

//! Inspection row model.
//!
//! Status is stored as text and the response list as JSONB. Both are
//! decoded back into core types by [`InspectionRow::into_finalized`], which
//! is the only place stored labels are mapped onto [`VehicleStatus`].

use fleetcheck_core::error::CoreError;
use fleetcheck_core::inspection::{PreInspectionMeta, Response};
use fleetcheck_core::signature::FinalizedInspection;
use fleetcheck_core::status::VehicleStatus;
use fleetcheck_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `inspections` table.
#[derive(Debug, Clone, FromRow)]
pub struct InspectionRow {
    pub id: DbId,
    pub inspector_id: DbId,
    pub inspector_name: String,
    pub driver_name: String,
    pub truck_number: String,
    pub transporter: String,
    pub depot: String,
    pub status: String,
    pub issue_count: i32,
    pub items: serde_json::Value,
    pub driver_signature: String,
    pub inspector_signature: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InspectionRow {
    pub fn into_finalized(self) -> Result<FinalizedInspection, CoreError> {
        let status = VehicleStatus::from_str_db(&self.status)?;
        let responses: Vec<Response> = serde_json::from_value(self.items).map_err(|e| {
            CoreError::Internal(format!("Inspection {} has malformed items: {e}", self.id))
        })?;
        Ok(FinalizedInspection {
            id: Some(self.id),
            inspector_id: self.inspector_id,
            inspector_name: self.inspector_name,
            meta: PreInspectionMeta {
                driver_name: self.driver_name,
                truck_number: self.truck_number,
                transporter: self.transporter,
                depot: self.depot,
            },
            responses,
            status,
            issue_count: self.issue_count.max(0) as u32,
            driver_signature: self.driver_signature,
            inspector_signature: self.inspector_signature,
            created_at: self.created_at,
        })
    }
}

/// Narrowing for list queries. `None` means "everyone".
#[derive(Debug, Clone, Default)]
pub struct InspectionFilter {
    pub inspector_id: Option<DbId>,
    pub limit: i64,
    pub offset: i64,
}

//! Wire types that only exist at the HTTP boundary. Domain records
//! (inspections, quality reports, the dashboard summary) come from
//! `fleetcheck_core` directly.

use chrono::{DateTime, Utc};
use fleetcheck_core::types::DbId;
use serde::{Deserialize, Serialize};

/// `{ "data": T }` envelope used by every JSON resource endpoint.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: DbId,
    pub full_name: String,
    pub role: String,
    pub username: Option<String>,
    pub staff_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub profile: Profile,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
}

/// `?inspector_id=&limit=&offset=` for record lists.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspector_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use fleetcheck_core::signature::FinalizedInspection;
    use fleetcheck_core::status::VehicleStatus;
    use serde_json::json;

    use super::*;

    fn stored(status: &str) -> serde_json::Value {
        json!({
            "id": 5,
            "inspector_id": 2,
            "inspector_name": "A",
            "driver_name": "D",
            "truck_number": "T",
            "transporter": "X",
            "depot": "Y",
            "items": [],
            "status": status,
            "issue_count": 0,
            "driver_signature": "d",
            "inspector_signature": "i",
            "created_at": "2024-01-03T08:00:00Z"
        })
    }

    #[test]
    fn legacy_pass_label_maps_to_operational() {
        let a: FinalizedInspection = serde_json::from_value(stored("PASS")).unwrap();
        let b: FinalizedInspection = serde_json::from_value(stored("OPERATIONAL")).unwrap();
        assert_eq!(a.status, VehicleStatus::Operational);
        assert_eq!(a.status, b.status);
        assert_eq!(a.id, Some(5));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_value::<FinalizedInspection>(stored("BROKEN")).is_err());
    }

    #[test]
    fn empty_filter_serializes_to_nothing() {
        assert_eq!(serde_json::to_value(RecordFilter::default()).unwrap(), json!({}));
    }
}

//! REST gateway.
//!
//! One method per endpoint. The client holds no session state: every
//! authenticated call takes the access token explicitly, so
//! [`ClientContext`](crate::context::ClientContext) decides which token to
//! send.

use fleetcheck_core::checklist::ChecklistItem;
use fleetcheck_core::inspection::{InspectionSubmission, ResponseInput};
use fleetcheck_core::metrics::DashboardSummary;
use fleetcheck_core::quality_report::{FinalizedQualityReport, QualityReportSubmission};
use fleetcheck_core::signature::{FinalizedInspection, RecordSink};
use fleetcheck_core::types::DbId;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::error::ClientError;
use crate::models::{
    ApiErrorBody, AuthResponse, DataEnvelope, NewUser, Profile, ProfileUpdate, RecordFilter,
    SignUpRequest,
};

/// HTTP client for the `/api/v1` surface.
#[derive(Debug, Clone)]
pub struct FleetcheckClient {
    client: reqwest::Client,
    base_url: String,
}

impl FleetcheckClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token)
    }

    fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> RequestBuilder {
        self.client.post(self.url(path)).json(body)
    }

    // ---- auth ----------------------------------------------------------

    pub async fn sign_up(&self, input: &SignUpRequest) -> Result<AuthResponse, ClientError> {
        let response = self.post("/auth/sign-up", input).send().await?;
        Self::parse_response(response).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = json!({ "email": email, "password": password });
        let response = self.post("/auth/sign-in", &body).send().await?;
        Self::parse_response(response).await
    }

    /// Exchange a refresh token for a new pair. The old token stops working.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, ClientError> {
        let body = json!({ "refresh_token": refresh_token });
        let response = self.post("/auth/refresh", &body).send().await?;
        Self::parse_response(response).await
    }

    pub async fn sign_out(&self, token: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/auth/sign-out"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Ask for a reset code. Succeeds whether or not the address is known.
    pub async fn request_reset_code(&self, email: &str) -> Result<(), ClientError> {
        let body = json!({ "email": email });
        let response = self.post("/auth/reset-password", &body).send().await?;
        Self::check_status(response).await
    }

    /// Trade a reset code for a signed-in session.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<AuthResponse, ClientError> {
        let body = json!({ "email": email, "code": code });
        let response = self.post("/auth/verify-code", &body).send().await?;
        Self::parse_response(response).await
    }

    pub async fn update_password(&self, token: &str, password: &str) -> Result<(), ClientError> {
        let body = json!({ "password": password });
        let response = self
            .post("/auth/update-password", &body)
            .bearer_auth(token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    // ---- checklist and inspections --------------------------------------

    pub async fn checklist(&self, token: &str) -> Result<Vec<ChecklistItem>, ClientError> {
        let response = self.get("/checklist", token).send().await?;
        Self::parse_data(response).await
    }

    /// Only finalized records can be submitted, so both signatures are
    /// always present on the wire.
    pub async fn submit_inspection(
        &self,
        token: &str,
        record: &FinalizedInspection,
    ) -> Result<FinalizedInspection, ClientError> {
        let response = self
            .post("/inspections", &inspection_submission(record))
            .bearer_auth(token)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn list_inspections(
        &self,
        token: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<FinalizedInspection>, ClientError> {
        let response = self.get("/inspections", token).query(filter).send().await?;
        Self::parse_data(response).await
    }

    pub async fn get_inspection(&self, token: &str, id: DbId) -> Result<FinalizedInspection, ClientError> {
        let response = self.get(&format!("/inspections/{id}"), token).send().await?;
        Self::parse_data(response).await
    }

    pub async fn delete_inspection(&self, token: &str, id: DbId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/inspections/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Printable HTML for one inspection.
    pub async fn inspection_report(&self, token: &str, id: DbId) -> Result<String, ClientError> {
        let response = self.get(&format!("/inspections/{id}/report"), token).send().await?;
        Self::parse_text(response).await
    }

    /// Printable HTML table of the caller's visible inspection history.
    pub async fn inspection_log_report(
        &self,
        token: &str,
        filter: &RecordFilter,
    ) -> Result<String, ClientError> {
        let response = self
            .get("/inspections/report", token)
            .query(filter)
            .send()
            .await?;
        Self::parse_text(response).await
    }

    // ---- quality reports -------------------------------------------------

    /// Like [`submit_inspection`](Self::submit_inspection), takes only a
    /// finalized (signed) report.
    pub async fn submit_quality_report(
        &self,
        token: &str,
        record: &FinalizedQualityReport,
    ) -> Result<FinalizedQualityReport, ClientError> {
        let response = self
            .post("/quality-reports", &quality_report_submission(record))
            .bearer_auth(token)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn list_quality_reports(
        &self,
        token: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<FinalizedQualityReport>, ClientError> {
        let response = self
            .get("/quality-reports", token)
            .query(filter)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn get_quality_report(
        &self,
        token: &str,
        id: DbId,
    ) -> Result<FinalizedQualityReport, ClientError> {
        let response = self.get(&format!("/quality-reports/{id}"), token).send().await?;
        Self::parse_data(response).await
    }

    pub async fn delete_quality_report(&self, token: &str, id: DbId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/quality-reports/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    pub async fn quality_report_html(&self, token: &str, id: DbId) -> Result<String, ClientError> {
        let response = self
            .get(&format!("/quality-reports/{id}/report"), token)
            .send()
            .await?;
        Self::parse_text(response).await
    }

    // ---- profiles, dashboard, admin ---------------------------------------

    pub async fn own_profile(&self, token: &str) -> Result<Profile, ClientError> {
        let response = self.get("/profile", token).send().await?;
        Self::parse_data(response).await
    }

    pub async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<Profile, ClientError> {
        let response = self
            .client
            .put(self.url("/profile"))
            .bearer_auth(token)
            .json(update)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn list_profiles(&self, token: &str) -> Result<Vec<Profile>, ClientError> {
        let response = self.get("/profiles", token).send().await?;
        Self::parse_data(response).await
    }

    /// `inspector_id` narrows a manager's view to one inspector; it is ignored
    /// for everyone else.
    pub async fn dashboard(
        &self,
        token: &str,
        inspector_id: Option<DbId>,
    ) -> Result<DashboardSummary, ClientError> {
        let filter = RecordFilter {
            inspector_id,
            ..RecordFilter::default()
        };
        let response = self
            .get("/dashboard/summary", token)
            .query(&filter)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn list_users(&self, token: &str) -> Result<Vec<Profile>, ClientError> {
        let response = self.get("/admin/users", token).send().await?;
        Self::parse_data(response).await
    }

    pub async fn create_user(&self, token: &str, user: &NewUser) -> Result<Profile, ClientError> {
        let response = self
            .post("/admin/users", user)
            .bearer_auth(token)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    /// Delete a user together with their records.
    pub async fn delete_user(&self, token: &str, user_id: DbId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/admin/users/{user_id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    // ---- response handling -------------------------------------------------

    /// Pass a 2xx response through; turn anything else into
    /// [`ClientError::Api`] using the server's `{error, code}` body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(api_error(status, &body))
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn parse_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let envelope: DataEnvelope<T> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    async fn parse_text(response: reqwest::Response) -> Result<String, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.text().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ClientError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

fn api_error(status: StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => ClientError::Api {
            status: status.as_u16(),
            code: parsed.code,
            message: parsed.error,
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            code: "HTTP_ERROR".to_string(),
            message: if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Request failed").to_string()
            } else {
                body.to_string()
            },
        },
    }
}

/// Repackage a finalized record as the submission body the server expects.
/// The server re-derives status and stamps its own timestamp.
pub fn inspection_submission(record: &FinalizedInspection) -> InspectionSubmission {
    InspectionSubmission {
        meta: record.meta.clone(),
        responses: record.responses.iter().map(ResponseInput::from).collect(),
        driver_signature: Some(record.driver_signature.clone()),
        inspector_signature: Some(record.inspector_signature.clone()),
    }
}

pub fn quality_report_submission(record: &FinalizedQualityReport) -> QualityReportSubmission {
    QualityReportSubmission {
        draft: record.draft.clone(),
        inspector_signature: Some(record.inspector_signature.clone()),
        sealer_signature: Some(record.sealer_signature.clone()),
    }
}

/// [`RecordSink`] that stores inspections through the REST API.
pub struct HttpInspectionSink<'a> {
    client: &'a FleetcheckClient,
    token: &'a str,
}

impl<'a> HttpInspectionSink<'a> {
    pub fn new(client: &'a FleetcheckClient, token: &'a str) -> Self {
        Self { client, token }
    }
}

impl RecordSink<FinalizedInspection> for HttpInspectionSink<'_> {
    type Stored = FinalizedInspection;
    type Error = ClientError;

    async fn insert(&self, record: &FinalizedInspection) -> Result<Self::Stored, Self::Error> {
        let stored = self
            .client
            .submit_inspection(self.token, record)
            .await?;
        tracing::info!(
            inspection_id = ?stored.id,
            status = %stored.status,
            "Inspection submitted"
        );
        Ok(stored)
    }
}

/// [`RecordSink`] that stores quality reports through the REST API.
pub struct HttpQualityReportSink<'a> {
    client: &'a FleetcheckClient,
    token: &'a str,
}

impl<'a> HttpQualityReportSink<'a> {
    pub fn new(client: &'a FleetcheckClient, token: &'a str) -> Self {
        Self { client, token }
    }
}

impl RecordSink<FinalizedQualityReport> for HttpQualityReportSink<'_> {
    type Stored = FinalizedQualityReport;
    type Error = ClientError;

    async fn insert(&self, record: &FinalizedQualityReport) -> Result<Self::Stored, Self::Error> {
        let stored = self.client.submit_quality_report(self.token, record).await?;
        tracing::info!(
            quality_report_id = ?stored.id,
            truck_number = %stored.draft.truck_number,
            "Quality report submitted"
        );
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use fleetcheck_core::checklist::catalog;
    use fleetcheck_core::inspection::{PreInspectionMeta, Response, Severity};
    use fleetcheck_core::quality_report::{Compartment, QualityParams, QualityReportDraft};
    use fleetcheck_core::status::VehicleStatus;

    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = FleetcheckClient::new("http://depot.local:3000/");
        assert_eq!(client.url("/checklist"), "http://depot.local:3000/api/v1/checklist");
    }

    #[test]
    fn structured_error_body_is_parsed() {
        let err = api_error(
            StatusCode::FORBIDDEN,
            r#"{"error":"Manager role required","code":"FORBIDDEN"}"#,
        );
        assert_matches!(err, ClientError::Api { status: 403, ref code, ref message }
            if code == "FORBIDDEN" && message == "Manager role required");
    }

    #[test]
    fn plain_error_body_is_kept() {
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_matches!(err, ClientError::Api { status: 502, ref message, .. } if message == "upstream down");
        let err = api_error(StatusCode::REQUEST_TIMEOUT, "");
        assert_matches!(err, ClientError::Api { ref message, .. } if message == "Request Timeout");
    }

    #[test]
    fn submission_round_trips_responses_without_status() {
        let items = catalog();
        let responses = vec![
            Response::pass(&items[0]),
            Response::fail(&items[1], Severity::Critical, Some("cracked".into()), None),
        ];
        let record = FinalizedInspection {
            id: Some(9),
            inspector_id: 3,
            inspector_name: "Thandi".into(),
            meta: PreInspectionMeta {
                driver_name: "Sipho".into(),
                truck_number: "TRK-7".into(),
                transporter: "Coastal".into(),
                depot: "Durban".into(),
            },
            responses,
            status: VehicleStatus::Grounded,
            issue_count: 1,
            driver_signature: "d".into(),
            inspector_signature: "i".into(),
            created_at: chrono::Utc::now(),
        };
        let sub = inspection_submission(&record);
        assert_eq!(sub.responses.len(), 2);
        assert_eq!(sub.responses[1].note.as_deref(), Some("cracked"));
        let json = serde_json::to_value(&sub).unwrap();
        assert!(json.get("status").is_none());
        assert_eq!(json["truck_number"], "TRK-7");
    }

    #[test]
    fn quality_submission_carries_both_signatures() {
        let record = FinalizedQualityReport {
            id: Some(4),
            inspector_id: 3,
            inspector_name: "Thandi".into(),
            draft: QualityReportDraft {
                company_name: "Coastal Haulage".into(),
                truck_number: "TRK-042".into(),
                product: "ULP 95".into(),
                depot: "Durban".into(),
                compartments: vec![Compartment {
                    litres: 8000.0,
                    certificate_level: "1200".into(),
                    product_level: "1198".into(),
                }],
                quality_params: QualityParams {
                    density: "0.745".into(),
                    temperature: "21C".into(),
                    appearance: "Clear".into(),
                    water_test: "Negative".into(),
                    remarks: None,
                },
                sealer_name: "Bongani".into(),
            },
            inspector_signature: "i".into(),
            sealer_signature: "s".into(),
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(quality_report_submission(&record)).unwrap();
        assert_eq!(json["inspector_signature"], "i");
        assert_eq!(json["sealer_signature"], "s");
        assert_eq!(json["truck_number"], "TRK-042");
        assert!(json.get("inspector_id").is_none());
    }
}

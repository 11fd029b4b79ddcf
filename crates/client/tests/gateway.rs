//! Gateway and context behaviour against a small in-process stub server.

use assert_matches::assert_matches;
use axum::extract::Json;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use fleetcheck_client::models::RecordFilter;
use fleetcheck_client::{ClientContext, ClientError, FleetcheckClient};
use fleetcheck_core::checklist::catalog;
use fleetcheck_core::inspection::{InspectionSubmission, PreInspectionMeta, Response, Severity};
use fleetcheck_core::navigation::Screen;
use fleetcheck_core::quality_report::{
    Compartment, QualityParams, QualityReportDraft, QualityReportSubmission,
};
use fleetcheck_core::signature::Signer;
use fleetcheck_core::status::{derive_status, VehicleStatus};
use serde_json::{json, Value};

fn profile() -> Value {
    json!({
        "user_id": 7,
        "full_name": "Thandi Nkosi",
        "role": "inspector",
        "username": null,
        "staff_id": "S-100",
        "updated_at": "2024-01-03T08:00:00Z"
    })
}

async fn sign_in(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] == "depot-pass-123" {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "expires_in": 900,
                "profile": profile()
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid email or password", "code": "UNAUTHORIZED" })),
        )
    }
}

/// Echo the submission back as a stored record, deriving status the way the
/// server does. Requires the bearer token issued by `sign_in`.
async fn create_inspection(
    headers: HeaderMap,
    Json(sub): Json<InspectionSubmission>,
) -> (StatusCode, Json<Value>) {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer access-1") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Missing token", "code": "UNAUTHORIZED" })),
        );
    }
    let items = catalog();
    let responses: Vec<_> = sub
        .responses
        .iter()
        .zip(items.iter())
        .map(|(r, item)| match r.severity {
            Some(sev) => Response::fail(item, sev, r.note.clone(), None),
            None => Response::pass(item),
        })
        .collect();
    let summary = derive_status(&responses);
    (
        StatusCode::CREATED,
        Json(json!({
            "data": {
                "id": 41,
                "inspector_id": 7,
                "inspector_name": "Thandi Nkosi",
                "driver_name": sub.meta.driver_name,
                "truck_number": sub.meta.truck_number,
                "transporter": sub.meta.transporter,
                "depot": sub.meta.depot,
                "items": responses,
                "status": summary.status,
                "issue_count": summary.issue_count,
                "driver_signature": sub.driver_signature,
                "inspector_signature": sub.inspector_signature,
                "created_at": "2024-01-03T08:00:00Z"
            }
        })),
    )
}

/// Store a quality report; both signatures must be present.
async fn create_quality_report(Json(sub): Json<QualityReportSubmission>) -> (StatusCode, Json<Value>) {
    let (Some(inspector_signature), Some(sealer_signature)) =
        (sub.inspector_signature, sub.sealer_signature)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Signatures Required", "code": "VALIDATION_ERROR" })),
        );
    };
    let mut data = serde_json::to_value(&sub.draft).unwrap();
    data["id"] = json!(12);
    data["inspector_id"] = json!(7);
    data["inspector_name"] = json!("Thandi Nkosi");
    data["inspector_signature"] = json!(inspector_signature);
    data["sealer_signature"] = json!(sealer_signature);
    data["created_at"] = json!("2024-01-03T08:00:00Z");
    (StatusCode::CREATED, Json(json!({ "data": data })))
}

async fn legacy_history() -> Json<Value> {
    Json(json!({
        "data": [{
            "id": 1,
            "inspector_id": 7,
            "inspector_name": "Thandi Nkosi",
            "driver_name": "D",
            "truck_number": "T",
            "transporter": "X",
            "depot": "Y",
            "items": [],
            "status": "PASS",
            "issue_count": 0,
            "driver_signature": "d",
            "inspector_signature": "i",
            "created_at": "2023-06-01T08:00:00Z"
        }]
    }))
}

async fn spawn_stub() -> FleetcheckClient {
    let app = Router::new()
        .route("/api/v1/auth/sign-in", post(sign_in))
        .route("/api/v1/auth/sign-out", post(|| async { StatusCode::NO_CONTENT }))
        .route(
            "/api/v1/inspections",
            get(legacy_history).post(create_inspection),
        )
        .route("/api/v1/quality-reports", post(create_quality_report))
        .route(
            "/api/v1/admin/users",
            get(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "Manager role required", "code": "FORBIDDEN" })),
                )
            }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    FleetcheckClient::new(format!("http://{addr}"))
}

fn meta() -> PreInspectionMeta {
    PreInspectionMeta {
        driver_name: "Sipho".into(),
        truck_number: "TRK-7".into(),
        transporter: "Coastal".into(),
        depot: "Durban".into(),
    }
}

#[tokio::test]
async fn wrong_password_surfaces_server_message() {
    let client = spawn_stub().await;
    let err = client.sign_in("a@b.co", "nope").await.unwrap_err();
    assert_matches!(err, ClientError::Api { status: 401, .. });
    assert_eq!(err.user_message(), "Invalid email or password");
}

#[tokio::test]
async fn forbidden_listing_is_an_api_error() {
    let client = spawn_stub().await;
    let err = client.list_users("access-1").await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn legacy_pass_status_reads_as_operational() {
    let client = spawn_stub().await;
    let records = client
        .list_inspections("access-1", &RecordFilter::default())
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, VehicleStatus::Operational);
}

#[tokio::test]
async fn full_capture_flow_submits_and_returns_to_dashboard() {
    let client = spawn_stub().await;
    let mut ctx = ClientContext::new(client);
    ctx.sign_in("thandi@depot.co", "depot-pass-123").await.unwrap();
    assert_eq!(ctx.screen(), Screen::Dashboard);

    ctx.navigate(Screen::PreInspection).unwrap();
    ctx.begin_inspection(catalog(), meta()).unwrap();
    let len = catalog().len();
    for step in 0..len {
        if step == 2 {
            ctx.record_fail(Some(Severity::Moderate), Some("worn".into()), None)
                .unwrap();
        } else {
            ctx.record_pass().unwrap();
        }
    }
    ctx.finish_checklist().unwrap();
    ctx.sign(Signer::Driver, "data:image/png;base64,AAA").unwrap();
    ctx.sign(Signer::Inspector, "data:image/png;base64,BBB").unwrap();

    let stored = ctx.submit_inspection(Utc::now()).await.unwrap();
    assert_eq!(stored.id, Some(41));
    assert_eq!(stored.status, VehicleStatus::Monitor);
    assert_eq!(stored.issue_count, 1);
    assert_eq!(ctx.screen(), Screen::Dashboard);
    assert!(ctx.capture().is_none());

    ctx.sign_out().await.unwrap();
    assert_eq!(ctx.screen(), Screen::SignIn);
    assert!(ctx.session().is_none());
}

#[tokio::test]
async fn signed_quality_report_is_submitted() {
    let client = spawn_stub().await;
    let mut ctx = ClientContext::new(client);
    ctx.sign_in("thandi@depot.co", "depot-pass-123").await.unwrap();

    ctx.begin_quality_report(QualityReportDraft {
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
            appearance: "Clear and bright".into(),
            water_test: "Negative".into(),
            remarks: None,
        },
        sealer_name: "Bongani".into(),
    })
    .unwrap();
    ctx.sign_quality_report(Signer::Inspector, "data:image/png;base64,III").unwrap();
    ctx.sign_quality_report(Signer::Sealer, "data:image/png;base64,SSS").unwrap();

    let stored = ctx.submit_quality_report(Utc::now()).await.unwrap();
    assert_eq!(stored.id, Some(12));
    assert_eq!(stored.sealer_signature, "data:image/png;base64,SSS");
    assert_eq!(stored.draft.truck_number, "TRK-042");
    assert!(ctx.quality_report().is_none());
    assert_eq!(ctx.screen(), Screen::Dashboard);
}

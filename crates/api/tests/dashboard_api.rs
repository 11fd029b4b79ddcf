//! Dashboard summary over stored history.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get_auth, token_for};
use fleetcheck_core::checklist::catalog;
use fleetcheck_core::inspection::{PreInspectionMeta, Response, Severity};
use fleetcheck_core::signature::FinalizedInspection;
use fleetcheck_core::status::derive_status;
use fleetcheck_core::types::DbId;
use fleetcheck_db::repositories::InspectionRepo;
use sqlx::PgPool;

/// Store an inspection `days_ago` days back, optionally with one critical
/// defect.
async fn seed(pool: &PgPool, inspector_id: DbId, name: &str, days_ago: i64, critical: bool) {
    let responses: Vec<Response> = catalog()
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if critical && i == 0 {
                Response::fail(&item, Severity::Critical, Some("leak".into()), None)
            } else {
                Response::pass(&item)
            }
        })
        .collect();
    let summary = derive_status(&responses);
    let record = FinalizedInspection {
        id: None,
        inspector_id,
        inspector_name: name.to_string(),
        meta: PreInspectionMeta {
            driver_name: "D".into(),
            truck_number: "T".into(),
            transporter: "X".into(),
            depot: "Y".into(),
        },
        responses,
        status: summary.status,
        issue_count: summary.issue_count,
        driver_signature: "d".into(),
        inspector_signature: "i".into(),
        created_at: Utc::now() - Duration::days(days_ago),
    };
    InspectionRepo::insert(pool, &record).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn summary_for_manager_and_inspector(pool: PgPool) {
    let a = common::create_user(&pool, "a@depot.example", "Alpha", "inspector").await;
    let b = common::create_user(&pool, "b@depot.example", "Bravo", "inspector").await;
    let m = common::create_user(&pool, "m@depot.example", "Manager", "manager").await;

    seed(&pool, a, "Alpha", 0, false).await;
    seed(&pool, a, "Alpha", 1, true).await;
    seed(&pool, a, "Alpha", 2, false).await;
    seed(&pool, b, "Bravo", 0, false).await;

    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/dashboard/summary", &token_for(m, "manager")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["total"], 4);
    assert_eq!(data["pass_rate"], 75);
    assert_eq!(data["streak"], 3);
    assert_eq!(data["weekly_activity"].as_array().unwrap().len(), 7);
    assert_eq!(data["attention"].as_array().unwrap().len(), 1);
    assert_eq!(data["rankings"][0]["name"], "Alpha");
    assert_eq!(data["rankings"][0]["count"], 3);
    assert_eq!(data["rankings"][1]["count"], 1);

    let json = body_json(
        get_auth(app, "/api/v1/dashboard/summary", &token_for(b, "inspector")).await,
    )
    .await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["pass_rate"], 100);
    assert_eq!(json["data"]["streak"], 1);
    assert!(json["data"]["attention"].as_array().unwrap().is_empty());
}

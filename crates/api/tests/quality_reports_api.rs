//! Quality report capture over HTTP.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, delete_auth, get_auth, post_json_auth, token_for};
use serde_json::{json, Value};
use sqlx::PgPool;

fn report() -> Value {
    json!({
        "company_name": "Coastal Haulage",
        "truck_number": "TRK-042",
        "product": "ULP 95",
        "depot": "Durban",
        "compartments": [
            { "litres": 8000.0, "certificate_level": "1200", "product_level": "1198" },
            { "litres": 7500.0, "certificate_level": "1100", "product_level": "1100" }
        ],
        "quality_params": {
            "density": "0.745",
            "temperature": "21C",
            "appearance": "Clear and bright",
            "water_test": "Negative"
        },
        "sealer_name": "Bongani",
        "inspector_signature": "data:image/png;base64,AAAA",
        "sealer_signature": "data:image/png;base64,BBBB"
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_list_get_and_render(pool: PgPool) {
    let id = common::create_user(&pool, "i@depot.example", "Ayanda", "inspector").await;
    let token = token_for(id, "inspector");
    let app = common::build_test_app(pool);

    let response = post_json_auth(app.clone(), "/api/v1/quality-reports", report(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let report_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["inspector_name"], "Ayanda");
    assert_eq!(json["data"]["compartments"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["quality_params"]["water_test"], "Negative");

    let json = body_json(get_auth(app.clone(), "/api/v1/quality-reports", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/quality-reports/{report_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        app,
        &format!("/api/v1/quality-reports/{report_id}/report"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Sealer: Bongani"));
    assert!(html.contains("ULP 95"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sealer_signature_is_required(pool: PgPool) {
    let id = common::create_user(&pool, "i@depot.example", "Ayanda", "inspector").await;
    let token = token_for(id, "inspector");
    let app = common::build_test_app(pool);

    let mut body = report();
    body["sealer_signature"] = Value::Null;
    let response = post_json_auth(app, "/api/v1/quality-reports", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Signatures Required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_drafts_are_rejected(pool: PgPool) {
    let id = common::create_user(&pool, "i@depot.example", "Ayanda", "inspector").await;
    let token = token_for(id, "inspector");
    let app = common::build_test_app(pool);

    let mut body = report();
    body["compartments"] = json!([]);
    let response = post_json_auth(app.clone(), "/api/v1/quality-reports", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = report();
    body["compartments"][0]["litres"] = json!(-5.0);
    let response = post_json_auth(app.clone(), "/api/v1/quality-reports", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = report();
    body["product"] = json!("");
    let response = post_json_auth(app, "/api/v1/quality-reports", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("product"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_inspectors_cannot_read_or_delete(pool: PgPool) {
    let a = common::create_user(&pool, "a@depot.example", "A", "inspector").await;
    let b = common::create_user(&pool, "b@depot.example", "B", "inspector").await;
    let app = common::build_test_app(pool);
    let (ta, tb) = (token_for(a, "inspector"), token_for(b, "inspector"));

    let json = body_json(post_json_auth(app.clone(), "/api/v1/quality-reports", report(), &ta).await).await;
    let report_id = json["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/quality-reports/{report_id}");

    assert_eq!(get_auth(app.clone(), &uri, &tb).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete_auth(app.clone(), &uri, &tb).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete_auth(app.clone(), &uri, &ta).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get_auth(app, &uri, &ta).await.status(), StatusCode::NOT_FOUND);
}

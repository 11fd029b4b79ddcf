#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use fleetcheck_api::app::build_router;
use fleetcheck_api::auth::jwt::{generate_access_token, JwtConfig};
use fleetcheck_api::auth::password::hash_password;
use fleetcheck_api::config::ServerConfig;
use fleetcheck_api::state::AppState;
use fleetcheck_core::types::DbId;
use fleetcheck_db::models::user::CreateAccount;
use fleetcheck_db::repositories::UserRepo;

pub const TEST_PASSWORD: &str = "depot-pass-123";

/// Safe defaults: UTC dashboard days, the dev CORS origin, a fixed secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        dashboard_utc_offset_minutes: 0,
        jwt: JwtConfig {
            secret: "fleetcheck-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// The production router and middleware stack over `pool`, with no mailer.
pub fn build_test_app(pool: PgPool) -> Router {
    build_router(AppState {
        pool,
        config: Arc::new(test_config()),
        mailer: None,
    })
}

/// Create a user with profile directly in the database. Returns the id.
pub async fn create_user(pool: &PgPool, email: &str, full_name: &str, role: &str) -> DbId {
    let (user, _profile) = UserRepo::create_with_profile(
        pool,
        &CreateAccount {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            full_name: full_name.to_string(),
            role: role.to_string(),
            username: None,
            staff_id: None,
        },
    )
    .await
    .unwrap();
    user.id
}

/// Mint an access token without going through sign-in. It is bound to no
/// stored session.
pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, 0, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

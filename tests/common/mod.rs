#![allow(dead_code)]

use std::sync::Arc;

use agrowatch::config::AppConfig;
use agrowatch::domain::Reading;
use agrowatch::{create_api_router, AppState, InMemoryRepositoryProvider};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tower::util::ServiceExt;

pub struct TestContext {
    pub store: Arc<InMemoryRepositoryProvider>,
    pub app: axum::Router,
}

pub fn build_test_context() -> TestContext {
    let mut config = AppConfig::default();
    config.security.bcrypt_cost = 4;

    let store = Arc::new(InMemoryRepositoryProvider::new());
    let state = AppState::new(store.clone(), &config);
    let app = create_api_router(state, &config, None);

    TestContext { store, app }
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, hour, minute, 0).unwrap()
}

pub fn reading(hour: u32, field1: Option<f64>, field2: Option<f64>) -> Reading {
    Reading {
        field1,
        field2,
        created_at: at(hour, 0),
    }
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    send(app, req).await
}

pub async fn request_raw(app: &axum::Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");

    send(app, req).await
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("router should respond");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn create_user(app: &axum::Router, name: &str, email: &str, password: &str) -> Value {
    let (status, body) = request_json(
        app,
        "POST",
        "/api/users",
        Some(serde_json::json!({ "nome": name, "email": email, "senha": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body
}

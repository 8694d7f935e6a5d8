//! HTTP API Suite
//!
//! Drives the router in-process and checks the submission contract
//! end to end: guard, naming, per-session isolation and error mapping.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rfid_roi::server::{router, AppState};
use rfid_roi::DashboardConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new(DashboardConfig::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn open_session(app: &Router, mode: &str) -> String {
    let (status, body) = send(app, "POST", "/api/sessions", Some(json!({ "mode": mode }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["mode"], mode);
    body["session_id"].as_str().unwrap().to_string()
}

fn default_input() -> Value {
    json!({
        "tag_cost": 50.0,
        "labor_cost": 1500.0,
        "time_before": 1.0,
        "time_after": 0.5,
        "task_count": 100.0,
        "tags_per_task": 10.0,
        "setup_cost": 100000.0,
        "maintenance_cost": 5000.0
    })
}

// 1. Cash-flow session: default inputs give the reference projection
#[tokio::test]
async fn test_cashflow_submission() {
    let app = app();
    let id = open_session(&app, "cashflow").await;
    let uri = format!("/api/sessions/{}/scenarios", id);

    let (status, body) = send(&app, "POST", &uri, Some(json!({ "trigger_count": 1, "input": default_input() }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appended"], true);

    let scenario = &body["scenarios"][0];
    assert_eq!(scenario["name"], "Scenario 1");
    assert_eq!(scenario["monthly_saving"], 75000.0);
    assert_eq!(scenario["monthly_cost"], 55000.0);
    assert_eq!(scenario["initial_investment"], 100000.0);

    let flow = scenario["cumulative_cashflow"].as_array().unwrap();
    assert_eq!(flow.len(), 24);
    assert_eq!(flow[0], -80000.0);
    assert_eq!(flow[1], -60000.0);
    assert_eq!(flow[23], 380000.0);

    assert_eq!(body["chart"]["traces"].as_array().unwrap().len(), 1);
    assert_eq!(body["table"]["rows"][0][3], "100000");
}

// 2. ROI session: single bar series with the reference ROI
#[tokio::test]
async fn test_roi_submission() {
    let app = app();
    let id = open_session(&app, "roi").await;
    let uri = format!("/api/sessions/{}/scenarios", id);

    for click in 1..=2 {
        send(&app, "POST", &uri, Some(json!({ "trigger_count": click, "input": default_input() }))).await;
    }

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "roi");

    let roi = body["scenarios"][0]["roi"].as_f64().unwrap();
    assert!((roi - (-51.61)).abs() < 0.01);

    let traces = body["chart"]["traces"].as_array().unwrap();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0]["x"], json!(["Scenario 1", "Scenario 2"]));
}

// 3. Stale counter: ledger untouched, same rendering returned
#[tokio::test]
async fn test_stale_trigger_is_ignored() {
    let app = app();
    let id = open_session(&app, "cashflow").await;
    let uri = format!("/api/sessions/{}/scenarios", id);

    let (_, empty) = send(&app, "POST", &uri, Some(json!({ "trigger_count": 0, "input": default_input() }))).await;
    assert_eq!(empty["appended"], false);
    assert!(empty["scenarios"].as_array().unwrap().is_empty());

    let (_, first) = send(&app, "POST", &uri, Some(json!({ "trigger_count": 1, "input": default_input() }))).await;
    let (_, repeat) = send(&app, "POST", &uri, Some(json!({ "trigger_count": 1, "input": default_input() }))).await;

    assert_eq!(repeat["appended"], false);
    assert_eq!(repeat["scenarios"], first["scenarios"]);
    assert_eq!(repeat["chart"], first["chart"]);
}

// 4. Sessions never share scenarios
#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = app();
    let a = open_session(&app, "cashflow").await;
    let b = open_session(&app, "cashflow").await;

    let uri_a = format!("/api/sessions/{}/scenarios", a);
    send(&app, "POST", &uri_a, Some(json!({ "trigger_count": 1, "input": default_input() }))).await;

    let (_, body) = send(&app, "GET", &format!("/api/sessions/{}/scenarios", b), None).await;
    assert!(body["scenarios"].as_array().unwrap().is_empty());
}

// 5. Error mapping at the HTTP boundary
#[tokio::test]
async fn test_error_statuses() {
    let app = app();

    let missing = format!("/api/sessions/{}/scenarios", uuid::Uuid::new_v4());
    let (status, body) = send(&app, "GET", &missing, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("unknown session"));

    let (status, _) = send(&app, "POST", "/api/sessions", Some(json!({ "mode": "pie" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing input fields are rejected before reaching the ledger
    let id = open_session(&app, "roi").await;
    let uri = format!("/api/sessions/{}/scenarios", id);
    let (status, _) = send(&app, "POST", &uri, Some(json!({ "trigger_count": 1, "input": { "tag_cost": 50.0 } }))).await;
    assert!(status.is_client_error());

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert!(body["scenarios"].as_array().unwrap().is_empty());
}

// 6. Page flow: root redirects into a fresh session page
#[tokio::test]
async fn test_root_redirects_to_session_page() {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/?mode=roi").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with("/sessions/"));

    let page = app
        .oneshot(Request::builder().uri(&location).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(page.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("MODE roi"));
    assert!(html.contains("Add scenario"));
}

// 7. Session creation without a body falls back to the configured mode
#[tokio::test]
async fn test_create_session_without_body() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["mode"], "cashflow");

    let id = body["session_id"].as_str().unwrap();
    let (status, view) = send(&app, "GET", &format!("/api/sessions/{}/scenarios", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(view["scenarios"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_health_and_defaults() {
    let app = app();
    let (_, defaults) = send(&app, "GET", "/api/defaults", None).await;
    assert_eq!(defaults, default_input());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

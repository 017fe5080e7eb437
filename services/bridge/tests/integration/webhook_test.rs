use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use uuid::Uuid;

use syncline_bridge::router::build_router;

use crate::helpers::test_state;

#[tokio::test]
async fn should_accept_webhook_and_publish_normalized_envelope() {
    let (state, mut rx) = test_state(None);
    let server = TestServer::new(build_router(state)).unwrap();

    let res = server
        .post("/jira/webhooks")
        .json(&json!({ "webhookEvent": "jira:issue_updated" }))
        .await;

    res.assert_status(StatusCode::OK);
    res.assert_json(&json!({ "status": "received" }));

    let raw = rx.try_recv().expect("envelope published");
    let envelope: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(envelope["type"], "JIRA_ISSUE_UPDATED");
    assert_eq!(envelope["source"], "jira");
    assert_eq!(envelope["meta"]["event"], "jira:issue_updated");
    assert_eq!(envelope["meta"]["identifier"], "unknown");
    assert_eq!(envelope["meta"]["retry"], "0");
    assert_eq!(envelope["meta"]["flow"], "Primary");
    assert_eq!(envelope["payload"]["webhookEvent"], "jira:issue_updated");
}

#[tokio::test]
async fn should_forward_webhook_meta_headers() {
    let (state, mut rx) = test_state(None);
    let server = TestServer::new(build_router(state)).unwrap();

    server
        .post("/jira/webhooks")
        .add_header("x-atlassian-webhook-identifier", "hook-42")
        .add_header("x-atlassian-webhook-retry", "3")
        .json(&json!({ "webhookEvent": "jira:issue_created" }))
        .await
        .assert_status(StatusCode::OK);

    let envelope: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
    assert_eq!(envelope["type"], "JIRA_ISSUE_CREATED");
    assert_eq!(envelope["meta"]["identifier"], "hook-42");
    assert_eq!(envelope["meta"]["retry"], "3");
}

#[tokio::test]
async fn should_reject_webhook_with_mismatched_secret() {
    let (state, mut rx) = test_state(Some("s3cret"));
    let server = TestServer::new(build_router(state)).unwrap();

    let res = server
        .post("/jira/webhooks")
        .add_header("x-webhook-secret", "wrong")
        .json(&json!({ "webhookEvent": "jira:issue_updated" }))
        .await;

    res.assert_status(StatusCode::UNAUTHORIZED);
    res.assert_json(&json!({ "status": "unauthorized" }));
    assert!(rx.try_recv().is_err(), "nothing published on rejection");
}

#[tokio::test]
async fn should_reject_webhook_with_missing_secret_header() {
    let (state, mut rx) = test_state(Some("s3cret"));
    let server = TestServer::new(build_router(state)).unwrap();

    let res = server
        .post("/jira/webhooks")
        .json(&json!({ "webhookEvent": "jira:issue_updated" }))
        .await;

    res.assert_status(StatusCode::UNAUTHORIZED);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn should_accept_webhook_with_correct_secret() {
    let (state, mut rx) = test_state(Some("s3cret"));
    let server = TestServer::new(build_router(state)).unwrap();

    let res = server
        .post("/jira/webhooks")
        .add_header("x-webhook-secret", "s3cret")
        .json(&json!({ "webhookEvent": "something_else" }))
        .await;

    res.assert_status(StatusCode::OK);
    let envelope: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
    assert_eq!(envelope["type"], "JIRA_WEBHOOK");
}

#[tokio::test]
async fn should_wrap_validation_errors_in_boundary_envelope() {
    let (state, _rx) = test_state(None);
    let server = TestServer::new(build_router(state)).unwrap();

    let res = server
        .post("/api/tasks")
        .json(&json!({ "title": "ok", "dueDate": "next tuesday" }))
        .await;

    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Validation Failed");
    assert_eq!(body["path"], "/api/tasks");
    assert!(body["timestamp"].is_string());
    assert!(body["errors"]["dueDate"].is_string());
}

#[tokio::test]
async fn should_wrap_unknown_status_in_boundary_envelope() {
    let (state, _rx) = test_state(None);
    let server = TestServer::new(build_router(state)).unwrap();
    let id = Uuid::new_v4();

    let res = server
        .patch(&format!("/api/tasks/{id}"))
        .json(&json!({ "status": "ARCHIVED" }))
        .await;

    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["path"], format!("/api/tasks/{id}"));
    assert!(body["errors"]["status"].is_string());
}

#[tokio::test]
async fn should_expose_health_endpoints() {
    let (state, _rx) = test_state(None);
    let server = TestServer::new(build_router(state)).unwrap();

    server.get("/healthz").await.assert_status(StatusCode::OK);
    server.get("/readyz").await.assert_status(StatusCode::OK);
}

//! End-to-end API tests over the in-process router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;

use eisen_server::csrf::{CsrfCheck, CsrfStore, CSRF_HEADER, CSRF_MAX_USES};
use eisen_server::repository::{init_memory_db, TaskRepository};
use eisen_server::{api_router, AppState};

fn test_app() -> Router {
    test_app_with_csrf().0
}

fn test_app_with_csrf() -> (Router, Arc<CsrfStore>) {
    let conn = init_memory_db().expect("init db");
    let repo = TaskRepository::new(Arc::new(Mutex::new(conn)));
    let csrf = Arc::new(CsrfStore::new());
    let state = AppState {
        repo,
        csrf: Arc::clone(&csrf),
        limits: None,
    };
    (Router::new().nest("/api", api_router(state)), csrf)
}

async fn send(
    app: &Router,
    method: Method,
    path: &str,
    csrf: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = csrf {
        builder = builder.header(CSRF_HEADER, token);
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("API responses are always JSON")
    };
    (status, value)
}

async fn fetch_csrf(app: &Router) -> String {
    let (status, body) = send(app, Method::GET, "/api/csrf-token", None, None).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token field").to_owned()
}

async fn create_task(app: &Router, token: &str, text: &str, quadrant: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/tasks",
        Some(token),
        Some(json!({"text": text, "quadrant": quadrant})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn create_sanitizes_markup_and_whitespace() {
    let app = test_app();
    let token = fetch_csrf(&app).await;

    let task = create_task(&app, &token, "  <b>Buy milk</b>  ", "urgentImportant").await;
    assert_eq!(task["text"], "Buy milk");
    assert!(task["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(task["createdAt"].as_i64().is_some());

    let (status, tasks) = send(&app, Method::GET, "/api/tasks", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks["urgentImportant"][0]["text"], "Buy milk");
}

#[tokio::test]
async fn patch_moves_task_between_quadrants() {
    let app = test_app();
    let token = fetch_csrf(&app).await;
    let task = create_task(&app, &token, "move me", "urgentImportant").await;
    let id = task["id"].as_str().unwrap();

    let (status, ack) = send(
        &app,
        Method::PATCH,
        &format!("/api/tasks/{id}"),
        Some(&token),
        Some(json!({"quadrant": "notUrgentImportant"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["success"], true);

    let (_, tasks) = send(&app, Method::GET, "/api/tasks", None, None).await;
    assert_eq!(tasks["notUrgentImportant"][0]["id"], id);
    assert_eq!(tasks["urgentImportant"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn complete_archives_the_task() {
    let app = test_app();
    let token = fetch_csrf(&app).await;
    let task = create_task(&app, &token, "finish me", "urgentNotImportant").await;
    let id = task["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/tasks/{id}/complete"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, tasks) = send(&app, Method::GET, "/api/tasks", None, None).await;
    assert_eq!(tasks["urgentNotImportant"].as_array().unwrap().len(), 0);

    let (status, archived) = send(&app, Method::GET, "/api/archived-tasks", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived[0]["id"], id);
    assert_eq!(archived[0]["quadrant"], "urgentNotImportant");
    let created = archived[0]["createdAt"].as_i64().unwrap();
    let completed = archived[0]["completedAt"].as_i64().unwrap();
    assert!(completed >= created);
}

#[tokio::test]
async fn double_complete_is_not_found() {
    let app = test_app();
    let token = fetch_csrf(&app).await;
    let task = create_task(&app, &token, "once only", "urgentImportant").await;
    let id = task["id"].as_str().unwrap();
    let path = format!("/api/tasks/{id}/complete");

    let (first, _) = send(&app, Method::POST, &path, Some(&token), None).await;
    assert_eq!(first, StatusCode::OK);
    let (second, body) = send(&app, Method::POST, &path, Some(&token), None).await;
    assert_eq!(second, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found or already completed");
}

#[tokio::test]
async fn empty_patch_body_is_rejected() {
    let app = test_app();
    let token = fetch_csrf(&app).await;
    let task = create_task(&app, &token, "unchanged", "urgentImportant").await;
    let id = task["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/tasks/{id}"),
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "At least one field must be provided");
}

#[tokio::test]
async fn create_validation_reports_first_violation() {
    let app = test_app();
    let token = fetch_csrf(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(&token),
        Some(json!({"quadrant": "urgentImportant"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text is required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(&token),
        Some(json!({"text": "x", "quadrant": "sideways"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Valid quadrant is required");
}

#[tokio::test]
async fn mutation_without_csrf_header_is_forbidden() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        None,
        Some(json!({"text": "x", "quadrant": "urgentImportant"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "CSRF_INVALID");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some("made-up-token"),
        Some(json!({"text": "x", "quadrant": "urgentImportant"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "CSRF_INVALID");
}

#[tokio::test]
async fn exhausted_token_gets_csrf_expired_then_invalid() {
    let (app, csrf) = test_app_with_csrf();
    let token = fetch_csrf(&app).await;

    // Burn the token's whole use budget against the shared store.
    let now = chrono::Utc::now().timestamp_millis();
    for _ in 0..CSRF_MAX_USES {
        assert_eq!(csrf.validate(&token, now), CsrfCheck::Valid);
    }

    // Over budget: the router reports the refresh-and-retry code.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(&token),
        Some(json!({"text": "x", "quadrant": "urgentImportant"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "CSRF_EXPIRED");

    // Exhaustion deletes the token, so a second attempt is terminal.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(&token),
        Some(json!({"text": "x", "quadrant": "urgentImportant"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "CSRF_INVALID");
}

#[tokio::test]
async fn reads_do_not_require_csrf() {
    let app = test_app();
    let (status, _) = send(&app, Method::GET, "/api/tasks", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, "/api/archived-tasks", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unmatched_api_path_is_json_404() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/definitely-not-a-route", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string(), "structured JSON, never HTML");
}

#[tokio::test]
async fn delete_unknown_task_is_not_found() {
    let app = test_app();
    let token = fetch_csrf(&app).await;
    let (status, _) = send(&app, Method::DELETE, "/api/tasks/ghost", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purge_only_removes_archived_tasks() {
    let app = test_app();
    let token = fetch_csrf(&app).await;
    let task = create_task(&app, &token, "to purge", "notUrgentNotImportant").await;
    let id = task["id"].as_str().unwrap();

    // Still active: the archived partition does not know it.
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/archived-tasks/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, Method::POST, &format!("/api/tasks/{id}/complete"), Some(&token), None).await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/archived-tasks/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, archived) = send(&app, Method::GET, "/api/archived-tasks", None, None).await;
    assert_eq!(archived.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn edit_preserves_position_and_id() {
    let app = test_app();
    let token = fetch_csrf(&app).await;
    let first = create_task(&app, &token, "first", "urgentImportant").await;
    let second = create_task(&app, &token, "second", "urgentImportant").await;
    let id = first["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/tasks/{id}"),
        Some(&token),
        Some(json!({"text": "first, renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, tasks) = send(&app, Method::GET, "/api/tasks", None, None).await;
    let quadrant = tasks["urgentImportant"].as_array().unwrap();
    assert_eq!(quadrant[0]["id"], id);
    assert_eq!(quadrant[0]["text"], "first, renamed");
    assert_eq!(quadrant[1]["id"], second["id"]);
}

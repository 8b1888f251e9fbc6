//! Mutation Router
//!
//! Binds HTTP verbs/paths to repository operations. Per mutating route the
//! pipeline is: rate-limit check -> CSRF validate -> schema validate (400,
//! first violation message) -> sanitize -> persistence -> status mapping.
//! Unmatched `/api/*` paths return structured JSON 404s so the client never
//! has to parse the SPA HTML shell as JSON.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use eisen_core::{
    validate_create, validate_update, AckResponse, ArchivedTask, CreateTaskRequest,
    CsrfTokenResponse, ErrorResponse, QuadrantsState, Task, UpdateTaskRequest,
};

use crate::csrf::{csrf_middleware, CsrfStore};
use crate::error::ApiError;
use crate::rate_limit::{rate_limit_middleware, RouteLimits};
use crate::repository::TaskRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: TaskRepository,
    pub csrf: Arc<CsrfStore>,
    /// None disables rate limiting (tests).
    pub limits: Option<Arc<RouteLimits>>,
}

/// The `/api` router with its middleware stack.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/csrf-token", get(issue_csrf_token))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", patch(update_task).delete(delete_task))
        .route("/tasks/{id}/complete", post(complete_task))
        .route("/archived-tasks", get(list_archived))
        .route("/archived-tasks/{id}", delete(purge_archived))
        .fallback(api_not_found)
        // Layer order: rate limit runs first, then CSRF, then the handler.
        .layer(middleware::from_fn_with_state(state.clone(), csrf_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .with_state(state)
}

/// Full application: API plus the SPA static shell.
pub fn app_router(state: AppState, static_dir: &Path) -> Router {
    let spa = ServeDir::new(static_dir)
        .fallback(ServeFile::new(static_dir.join("index.html")));
    Router::new()
        .nest("/api", api_router(state))
        .fallback_service(spa)
        .layer(TraceLayer::new_for_http())
}

async fn issue_csrf_token(State(state): State<AppState>) -> Json<CsrfTokenResponse> {
    let token = state.csrf.issue(Utc::now().timestamp_millis());
    Json(CsrfTokenResponse { token })
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<QuadrantsState>, ApiError> {
    Ok(Json(state.repo.list_active().await?))
}

async fn create_task(
    State(state): State<AppState>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let valid = validate_create(body.text.as_deref(), body.quadrant.as_deref())
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;

    let task = Task {
        id: Uuid::new_v4().to_string(),
        text: valid.text,
        created_at: Utc::now().timestamp_millis(),
    };
    state
        .repo
        .insert(&task.id, &task.text, valid.quadrant, task.created_at)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let valid = validate_update(body.text.as_deref(), body.quadrant.as_deref())
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;

    if let Some(text) = &valid.text {
        if !state.repo.update_text(&id, text).await? {
            return Err(ApiError::NotFound("Task not found".into()));
        }
    }
    if let Some(quadrant) = valid.quadrant {
        if !state.repo.update_quadrant(&id, quadrant).await? {
            return Err(ApiError::NotFound("Task not found".into()));
        }
    }
    Ok(Json(AckResponse::ok()))
}

async fn delete_task(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<AckResponse>, ApiError> {
    if !state.repo.delete(&id).await? {
        return Err(ApiError::NotFound("Task not found".into()));
    }
    Ok(Json(AckResponse::ok()))
}

async fn complete_task(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<AckResponse>, ApiError> {
    // Conditional update; zero rows conflates "unknown id" with "already
    // completed", which the client cannot act on differently anyway.
    if !state.repo.complete(&id, Utc::now().timestamp_millis()).await? {
        return Err(ApiError::NotFound("Task not found or already completed".into()));
    }
    Ok(Json(AckResponse::ok()))
}

async fn list_archived(State(state): State<AppState>) -> Result<Json<Vec<ArchivedTask>>, ApiError> {
    Ok(Json(state.repo.list_archived().await?))
}

async fn purge_archived(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<AckResponse>, ApiError> {
    if !state.repo.delete_archived(&id).await? {
        return Err(ApiError::NotFound("Task not found".into()));
    }
    Ok(Json(AckResponse::ok()))
}

async fn api_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse { error: "Not found".into(), code: None }),
    )
}

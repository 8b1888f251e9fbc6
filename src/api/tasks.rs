//! Task Endpoints
//!
//! Typed wrappers over the task API. Reads go straight through the fetch
//! wrapper (optionally abortable); mutations go through the CSRF cache.

use web_sys::AbortSignal;

use eisen_core::{ArchivedTask, QuadrantKey, QuadrantsState, Task, UpdateTaskRequest};

use super::csrf::CsrfCache;
use super::http::{self, into_result, ApiError};

const API_BASE: &str = "/api";

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::Server(format!("bad response: {err}")))
}

/// Fetch all active tasks, partitioned by quadrant.
pub async fn fetch_tasks(signal: Option<&AbortSignal>) -> Result<QuadrantsState, ApiError> {
    let response = http::send("GET", &format!("{API_BASE}/tasks"), None, None, signal).await?;
    decode(&into_result(response)?)
}

/// Create a task; the returned task carries the server-assigned id.
pub async fn create_task(
    csrf: &CsrfCache,
    quadrant: QuadrantKey,
    text: &str,
) -> Result<Task, ApiError> {
    let body = serde_json::json!({ "text": text, "quadrant": quadrant }).to_string();
    let body = csrf
        .send_mutation("POST", &format!("{API_BASE}/tasks"), Some(body))
        .await?;
    decode(&body)
}

pub async fn update_task(
    csrf: &CsrfCache,
    id: &str,
    request: &UpdateTaskRequest,
) -> Result<(), ApiError> {
    let body = serde_json::to_string(request)
        .map_err(|err| ApiError::Network(err.to_string()))?;
    csrf.send_mutation("PATCH", &format!("{API_BASE}/tasks/{id}"), Some(body))
        .await?;
    Ok(())
}

pub async fn delete_task(csrf: &CsrfCache, id: &str) -> Result<(), ApiError> {
    csrf.send_mutation("DELETE", &format!("{API_BASE}/tasks/{id}"), None)
        .await?;
    Ok(())
}

pub async fn complete_task(csrf: &CsrfCache, id: &str) -> Result<(), ApiError> {
    csrf.send_mutation("POST", &format!("{API_BASE}/tasks/{id}/complete"), None)
        .await?;
    Ok(())
}

pub async fn fetch_archived() -> Result<Vec<ArchivedTask>, ApiError> {
    let response = http::send("GET", &format!("{API_BASE}/archived-tasks"), None, None, None).await?;
    decode(&into_result(response)?)
}

pub async fn purge_archived(csrf: &CsrfCache, id: &str) -> Result<(), ApiError> {
    csrf.send_mutation("DELETE", &format!("{API_BASE}/archived-tasks/{id}"), None)
        .await?;
    Ok(())
}

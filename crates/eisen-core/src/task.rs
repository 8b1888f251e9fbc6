//! Task Entities and API DTOs
//!
//! Wire-level representations shared by the server routes and the client
//! API bindings. Timestamps are Unix milliseconds.

use serde::{Deserialize, Serialize};

use crate::quadrant::QuadrantKey;

/// An active task as returned by the API.
///
/// The quadrant is not part of this payload; active tasks are always
/// delivered already partitioned into a [`crate::QuadrantsState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub created_at: i64,
}

/// A completed task. Retains the quadrant it was completed from for display.
///
/// The transition active -> archived happens exactly once and is
/// irreversible; archived tasks only ever leave by explicit purge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedTask {
    pub id: String,
    pub text: String,
    pub quadrant: QuadrantKey,
    pub created_at: i64,
    pub completed_at: i64,
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub text: Option<String>,
    pub quadrant: Option<String>,
}

/// Body of `PATCH /api/tasks/:id`. At least one field must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quadrant: Option<String>,
}

/// Response of `GET /api/csrf-token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfTokenResponse {
    pub token: String,
}

/// Generic mutation acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Error body for every non-2xx API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable discriminator, currently only used to tell an
    /// expired CSRF token (refresh and retry) from an invalid one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

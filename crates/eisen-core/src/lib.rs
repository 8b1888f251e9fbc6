//! Shared core for the Eisenhower matrix task organizer.
//!
//! Everything both halves of the app agree on lives here: the task and
//! quadrant types as they appear on the wire, the free-text sanitizer, the
//! request validation rules, and the pure quadrant-state operations the
//! client sync layer builds on. This crate compiles for both native (server)
//! and wasm32 (frontend) targets and has no I/O.

mod quadrant;
mod sanitize;
mod state;
mod task;
mod validation;

pub use quadrant::QuadrantKey;
pub use sanitize::{is_valid_task_text, sanitize_text, MAX_TEXT_LENGTH};
pub use state::QuadrantsState;
pub use task::{AckResponse, ArchivedTask, CreateTaskRequest, CsrfTokenResponse, ErrorResponse, Task, UpdateTaskRequest};
pub use validation::{validate_create, validate_update, CreateTask, UpdateTask, ValidationError};

//! Eisen Server
//!
//! Layered architecture:
//! - repository: SQLite persistence gateway for tasks
//! - csrf: issuance and validation of mutation tokens
//! - rate_limit: per-client request caps by route class
//! - routes: HTTP handlers binding verbs/paths to repository operations

pub mod config;
pub mod csrf;
pub mod error;
pub mod rate_limit;
pub mod repository;
pub mod routes;

pub use config::Config;
pub use routes::{api_router, app_router, AppState};

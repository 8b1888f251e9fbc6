//! API Bindings
//!
//! Frontend bindings to the HTTP API, organized by concern: the raw fetch
//! wrapper, the CSRF token cache, and typed endpoint wrappers.

mod csrf;
mod http;
mod tasks;

pub use csrf::CsrfCache;
pub use http::ApiError;
pub use tasks::*;

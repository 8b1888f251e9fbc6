//! API Error Taxonomy
//!
//! Every route handler returns `Result<_, ApiError>`; no other error type
//! crosses the HTTP boundary. The two CSRF variants carry distinct machine
//! codes so the client can tell "refresh the token and retry" apart from a
//! terminal rejection.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use eisen_core::ErrorResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed validation; carries the first violated rule's
    /// message.
    #[error("{0}")]
    BadRequest(String),
    /// CSRF token missing or unknown.
    #[error("Invalid CSRF token")]
    CsrfInvalid,
    /// CSRF token past its TTL or use cap; the client should refresh and
    /// retry once.
    #[error("CSRF token expired")]
    CsrfExpired,
    #[error("{0}")]
    NotFound(String),
    #[error("Too many requests")]
    RateLimited,
    /// Persistence or other unexpected failure. The detail is logged, never
    /// sent to the client.
    #[error("Internal server error")]
    Internal(String),
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::CsrfInvalid | ApiError::CsrfExpired => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> Option<String> {
        match self {
            ApiError::CsrfInvalid => Some("CSRF_INVALID".into()),
            ApiError::CsrfExpired => Some("CSRF_EXPIRED".into()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("internal error: {detail}");
        }
        let body = ErrorResponse { error: self.to_string(), code: self.code() };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csrf_variants_have_distinct_codes() {
        assert_eq!(ApiError::CsrfInvalid.code().as_deref(), Some("CSRF_INVALID"));
        assert_eq!(ApiError::CsrfExpired.code().as_deref(), Some("CSRF_EXPIRED"));
        assert!(ApiError::NotFound("x".into()).code().is_none());
    }

    #[test]
    fn internal_error_hides_detail() {
        let err = ApiError::Internal("table tasks is on fire".into());
        assert_eq!(err.to_string(), "Internal server error");
    }
}

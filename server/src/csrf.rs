//! CSRF Token Guard
//!
//! Double-submit-style defense for an app with no authentication: the token
//! proves a mutating request originated from a page that could read the
//! token, not a user identity. Tokens are short-lived, usage-capped, and the
//! store is capacity-bounded so token-issuance abuse cannot grow memory
//! without bound.
//!
//! Per-token lifecycle: `Issued -> Active (N uses) -> Expired|Exhausted ->
//! Deleted`. All operations take an explicit `now_ms` so the lifecycle is
//! testable without a clock.

use std::collections::HashMap;
use std::sync::Mutex;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::AppState;

/// Token lifetime from issuance.
pub const CSRF_TTL_MS: i64 = 60 * 60 * 1000;
/// Maximum validations per token before it is considered exhausted.
pub const CSRF_MAX_USES: u32 = 100;
/// Global token-table ceiling.
pub const CSRF_CAPACITY: usize = 1000;
/// How many oldest entries to drop when the ceiling is hit.
pub const CSRF_EVICT_BATCH: usize = 100;
/// Background sweep cadence.
pub const CSRF_SWEEP_INTERVAL_SECS: u64 = 60;

/// Header carrying the token on every mutating request.
pub const CSRF_HEADER: &str = "x-csrf-token";

#[derive(Debug, Clone)]
struct TokenEntry {
    issued_at_ms: i64,
    last_used_ms: i64,
    use_count: u32,
}

/// Outcome of validating a token against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfCheck {
    Valid,
    /// Absent or unknown token; terminal for the request.
    Invalid,
    /// Known token past its TTL or use cap; the client may retry once with a
    /// fresh token.
    Expired,
}

/// Process-wide token store, constructed once at startup and injected into
/// the router state.
#[derive(Debug, Default)]
pub struct CsrfStore {
    tokens: Mutex<HashMap<String, TokenEntry>>,
}

impl CsrfStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token, evicting the oldest batch first if the table is
    /// at capacity. Amortized bound, not LRU-precise.
    pub fn issue(&self, now_ms: i64) -> String {
        let mut tokens = self.tokens.lock().expect("csrf store poisoned");
        if tokens.len() >= CSRF_CAPACITY {
            let mut by_age: Vec<(String, i64)> = tokens
                .iter()
                .map(|(value, entry)| (value.clone(), entry.issued_at_ms))
                .collect();
            by_age.sort_by_key(|(_, issued_at)| *issued_at);
            for (value, _) in by_age.into_iter().take(CSRF_EVICT_BATCH) {
                tokens.remove(&value);
            }
        }

        let value = Uuid::new_v4().to_string();
        tokens.insert(
            value.clone(),
            TokenEntry { issued_at_ms: now_ms, last_used_ms: now_ms, use_count: 0 },
        );
        value
    }

    /// Validate and consume one use of a token.
    ///
    /// The whole check-and-increment runs under the table lock, so two
    /// concurrent requests cannot both observe a count below the cap and
    /// slip one extra use past it.
    pub fn validate(&self, token: &str, now_ms: i64) -> CsrfCheck {
        let mut tokens = self.tokens.lock().expect("csrf store poisoned");
        let Some(entry) = tokens.get_mut(token) else {
            return CsrfCheck::Invalid;
        };
        if now_ms - entry.issued_at_ms > CSRF_TTL_MS {
            tokens.remove(token);
            return CsrfCheck::Expired;
        }
        entry.use_count += 1;
        if entry.use_count > CSRF_MAX_USES {
            tokens.remove(token);
            return CsrfCheck::Expired;
        }
        entry.last_used_ms = now_ms;
        CsrfCheck::Valid
    }

    /// Drop every token older than the TTL, independent of use count.
    /// Called from a background interval task.
    pub fn sweep(&self, now_ms: i64) {
        let mut tokens = self.tokens.lock().expect("csrf store poisoned");
        tokens.retain(|_, entry| now_ms - entry.issued_at_ms <= CSRF_TTL_MS);
    }

    pub fn len(&self) -> usize {
        self.tokens.lock().expect("csrf store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Middleware validating the CSRF header on every mutating request.
pub async fn csrf_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if matches!(*request.method(), Method::POST | Method::PATCH | Method::DELETE) {
        let token = request
            .headers()
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok());
        let Some(token) = token else {
            return Err(ApiError::CsrfInvalid);
        };
        match state.csrf.validate(token, Utc::now().timestamp_millis()) {
            CsrfCheck::Valid => {}
            CsrfCheck::Invalid => return Err(ApiError::CsrfInvalid),
            CsrfCheck::Expired => return Err(ApiError::CsrfExpired),
        }
    }
    Ok(next.run(request).await)
}

//! CSRF Token Cache
//!
//! Caches the current token and wraps every mutating request with the
//! acquire/refresh protocol: fetch a token lazily, and on a 403 fetch
//! exactly one replacement and retry once. A second 403 is surfaced as the
//! final failure - no unbounded retry loop.

use leptos::prelude::*;

use eisen_core::CsrfTokenResponse;

use super::http::{self, into_result, ApiError};

const TOKEN_URL: &str = "/api/csrf-token";

#[derive(Clone, Copy)]
pub struct CsrfCache {
    token: StoredValue<Option<String>>,
}

impl CsrfCache {
    pub fn new() -> Self {
        Self { token: StoredValue::new(None) }
    }

    /// Fetch a fresh token unconditionally, replacing any cached one.
    async fn refresh(&self) -> Result<String, ApiError> {
        let response = http::send("GET", TOKEN_URL, None, None, None).await?;
        let body = into_result(response)?;
        let parsed: CsrfTokenResponse = serde_json::from_str(&body)
            .map_err(|err| ApiError::Server(format!("bad token response: {err}")))?;
        self.token.set_value(Some(parsed.token.clone()));
        Ok(parsed.token)
    }

    async fn ensure(&self) -> Result<String, ApiError> {
        match self.token.get_value() {
            Some(token) => Ok(token),
            None => self.refresh().await,
        }
    }

    /// Warm the cache on startup so the first mutation doesn't pay the
    /// extra round trip. Failure is fine; the mutation path refetches.
    pub async fn prefetch(&self) {
        let _ = self.ensure().await;
    }

    /// Send a mutating request with the CSRF header, retrying once with a
    /// fresh token on 403.
    pub async fn send_mutation(
        &self,
        method: &str,
        url: &str,
        body: Option<String>,
    ) -> Result<String, ApiError> {
        let token = self.ensure().await?;
        let response = http::send(method, url, body.as_deref(), Some(&token), None).await?;
        if response.status != 403 {
            return into_result(response);
        }

        let fresh = self.refresh().await?;
        let retry = http::send(method, url, body.as_deref(), Some(&fresh), None).await?;
        into_result(retry)
    }
}

impl Default for CsrfCache {
    fn default() -> Self {
        Self::new()
    }
}

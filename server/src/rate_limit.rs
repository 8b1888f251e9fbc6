//! Rate Limiting
//!
//! Per-client request caps via `governor`, keyed by peer IP, with one quota
//! per route class: token issuance, reads, and writes. Disabled entirely
//! when the state carries no limits (tests, or `RATE_LIMIT_DISABLED`).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};

use crate::error::ApiError;
use crate::routes::AppState;

type KeyedLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

const TOKENS_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(30) {
    Some(n) => n,
    None => unreachable!(),
};
const READS_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(300) {
    Some(n) => n,
    None => unreachable!(),
};
const WRITES_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(120) {
    Some(n) => n,
    None => unreachable!(),
};

/// Which quota bucket a request draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    TokenIssuance,
    Read,
    Write,
}

impl RouteClass {
    pub fn of(method: &Method, path: &str) -> Self {
        if path.ends_with("/csrf-token") {
            RouteClass::TokenIssuance
        } else if method == Method::GET {
            RouteClass::Read
        } else {
            RouteClass::Write
        }
    }
}

/// One keyed limiter per route class.
pub struct RouteLimits {
    token: KeyedLimiter,
    read: KeyedLimiter,
    write: KeyedLimiter,
}

impl RouteLimits {
    pub fn new() -> Self {
        Self {
            token: RateLimiter::keyed(Quota::per_minute(TOKENS_PER_MINUTE)),
            read: RateLimiter::keyed(Quota::per_minute(READS_PER_MINUTE)),
            write: RateLimiter::keyed(Quota::per_minute(WRITES_PER_MINUTE)),
        }
    }

    pub fn check(&self, class: RouteClass, client: IpAddr) -> Result<(), ApiError> {
        let limiter = match class {
            RouteClass::TokenIssuance => &self.token,
            RouteClass::Read => &self.read,
            RouteClass::Write => &self.write,
        };
        limiter.check_key(&client).map_err(|_| ApiError::RateLimited)
    }
}

impl Default for RouteLimits {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware enforcing the per-client quota for the request's route class.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(limits) = &state.limits {
        // ConnectInfo is absent under `tower::oneshot`; treat those callers
        // as localhost.
        let client = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let class = RouteClass::of(request.method(), request.uri().path());
        if let Err(err) = limits.check(class, client) {
            tracing::warn!("rate limit exceeded for {client} ({class:?})");
            return Err(err);
        }
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_routes() {
        assert_eq!(RouteClass::of(&Method::GET, "/api/csrf-token"), RouteClass::TokenIssuance);
        assert_eq!(RouteClass::of(&Method::GET, "/api/tasks"), RouteClass::Read);
        assert_eq!(RouteClass::of(&Method::POST, "/api/tasks"), RouteClass::Write);
        assert_eq!(RouteClass::of(&Method::DELETE, "/api/tasks/x"), RouteClass::Write);
    }

    #[test]
    fn quota_is_per_client() {
        let limits = RouteLimits::new();
        let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));
        for _ in 0..TOKENS_PER_MINUTE.get() {
            limits.check(RouteClass::TokenIssuance, a).unwrap();
        }
        assert!(limits.check(RouteClass::TokenIssuance, a).is_err());
        // A different client still has budget.
        assert!(limits.check(RouteClass::TokenIssuance, b).is_ok());
        // And so does the same client in another class.
        assert!(limits.check(RouteClass::Read, a).is_ok());
    }
}

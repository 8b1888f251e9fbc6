//! Fetch Wrapper
//!
//! Thin layer over `web_sys` fetch: builds the request, classifies the
//! response by status, and maps transport failures into [`ApiError`].
//! An aborted fetch is its own variant so a superseded list fetch can be
//! treated as a no-op rather than an error.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, Request, RequestInit, Response};

use eisen_core::ErrorResponse;

/// Client-side error taxonomy, mirroring the server's status mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 400; carries the server's validation message.
    BadRequest(String),
    /// 403; `expired` distinguishes a refresh-and-retry token from a
    /// terminal rejection.
    Forbidden { expired: bool },
    /// 404.
    NotFound(String),
    /// 429.
    RateLimited,
    /// 5xx or an undecodable response.
    Server(String),
    /// Transport failure.
    Network(String),
    /// The fetch was superseded and aborted; not an error for state.
    Aborted,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => f.write_str(msg),
            ApiError::Forbidden { .. } => f.write_str("Request was rejected, please reload the page"),
            ApiError::RateLimited => f.write_str("Too many requests, slow down"),
            ApiError::Server(msg) => write!(f, "Server error: {msg}"),
            ApiError::Network(msg) => write!(f, "Network error: {msg}"),
            ApiError::Aborted => f.write_str("Request aborted"),
        }
    }
}

pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Issue a request with an optional JSON body, CSRF header and abort signal.
pub async fn send(
    method: &str,
    url: &str,
    body: Option<&str>,
    csrf: Option<&str>,
    signal: Option<&AbortSignal>,
) -> Result<HttpResponse, ApiError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(body));
    }
    if let Some(signal) = signal {
        opts.set_signal(Some(signal));
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(network_err)?;
    if body.is_some() {
        request.headers().set("Content-Type", "application/json").map_err(network_err)?;
    }
    if let Some(token) = csrf {
        request.headers().set("X-CSRF-Token", token).map_err(network_err)?;
    }

    let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(fetch_err)?;
    let response: Response = response.dyn_into().map_err(network_err)?;

    let text = JsFuture::from(response.text().map_err(network_err)?)
        .await
        .map_err(fetch_err)?;
    Ok(HttpResponse {
        status: response.status(),
        body: text.as_string().unwrap_or_default(),
    })
}

/// Map a non-2xx response to the error taxonomy; pass the body through
/// otherwise.
pub fn into_result(response: HttpResponse) -> Result<String, ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(response.body);
    }
    let parsed: Option<ErrorResponse> = serde_json::from_str(&response.body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.error.clone())
        .unwrap_or_else(|| format!("HTTP {}", response.status));
    Err(match response.status {
        400 => ApiError::BadRequest(message),
        403 => ApiError::Forbidden {
            expired: parsed.and_then(|e| e.code).as_deref() == Some("CSRF_EXPIRED"),
        },
        404 => ApiError::NotFound(message),
        429 => ApiError::RateLimited,
        _ => ApiError::Server(message),
    })
}

fn network_err(err: JsValue) -> ApiError {
    ApiError::Network(format!("{err:?}"))
}

fn fetch_err(err: JsValue) -> ApiError {
    // An aborted fetch rejects with a DOMException named AbortError.
    if err
        .dyn_ref::<web_sys::DomException>()
        .is_some_and(|ex| ex.name() == "AbortError")
    {
        ApiError::Aborted
    } else {
        network_err(err)
    }
}

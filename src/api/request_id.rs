//! `X-Request-ID` assignment.
//!
//! A caller-supplied ID is reused when it is short printable ASCII; anything
//! else is replaced with a fresh UUID v4. The ID is echoed on the response and
//! carried in a `tracing` span around the rest of the stack. Handlers reach it
//! through the [`RequestId`] extension.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument as _;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied ID accepted as-is.
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// The ID assigned to the current request, already valid as a header value.
#[derive(Clone, Debug)]
pub struct RequestId(HeaderValue);

impl RequestId {
    pub fn generate() -> Self {
        let id = Uuid::new_v4().to_string();
        // A hyphenated UUID is always a valid header value.
        Self(HeaderValue::from_str(&id).unwrap_or_else(|_| HeaderValue::from_static("unknown")))
    }

    /// The caller's ID, if present and acceptable.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(REQUEST_ID_HEADER)?;
        let bytes = value.as_bytes();
        let acceptable = !bytes.is_empty()
            && bytes.len() <= MAX_REQUEST_ID_LEN
            && bytes.iter().all(|b| b.is_ascii_graphic());
        acceptable.then(|| Self(value.clone()))
    }

    pub fn as_str(&self) -> &str {
        // Only visible ASCII is ever stored.
        self.0.to_str().unwrap_or_default()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axum middleware that assigns a [`RequestId`] to every request.
///
/// Apply this **inside** the `tower_http::TraceLayer` so it runs within the
/// trace span.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_headers(req.headers()).unwrap_or_else(RequestId::generate);
    req.extensions_mut().insert(id.clone());

    let span = tracing::debug_span!("request_id", id = %id);
    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, id.0);
    response
}

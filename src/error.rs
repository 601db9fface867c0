//! HTTP error type for axum request handlers and middleware.
//!
//! [`ApiError`] converts into a JSON response automatically via
//! [`IntoResponse`], so the router's fallback and the timeout guard share one
//! error shape:
//!
//! ```json
//! { "error": "not found: /healthz" }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("request timed out")]
    Timeout,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(_) => tracing::warn!(error = %self, "handler error"),
            _ => tracing::debug!(error = %self, status = status.as_u16(), "request rejected"),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Turn a failure raised by a tower middleware into an [`ApiError`].
///
/// Used with `axum::error_handling::HandleErrorLayer`; a
/// [`tower::timeout::error::Elapsed`] becomes [`ApiError::Timeout`].
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(err.to_string())
    }
}

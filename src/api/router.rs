//! The host application: route table plus the middleware stack around it.
//!
//! Only `GET /health` is registered. Every other path falls through to a JSON
//! 404 so a probe pointed at the wrong URL fails loudly instead of matching a
//! wildcard.

use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, http::Uri, routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::{
    api::{
        health,
        request_id::{request_id_middleware, RequestId},
    },
    config::ServerConfig,
    error::{handle_middleware_error, ApiError},
};

/// Build the service's axum router.
pub fn router(config: &ServerConfig) -> Router {
    with_middleware(routes(), config.request_timeout())
}

fn routes() -> Router {
    Router::new()
        .route("/health", get(health::health))
        .fallback(not_found)
}

/// Layer order, innermost first: timeout guard, request ID, request tracing.
fn with_middleware(routes: Router, request_timeout: Duration) -> Router {
    routes
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout),
        )
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
}

async fn not_found(request_id: Option<Extension<RequestId>>, uri: Uri) -> ApiError {
    let request_id = request_id.map(|Extension(id)| id);
    tracing::info!(
        request_id = request_id.as_ref().map(RequestId::as_str),
        path = uri.path(),
        "no route matched"
    );
    ApiError::NotFound(uri.path().to_string())
}

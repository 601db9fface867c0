//! Liveness probe endpoint.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// Liveness state reported by `GET /health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
}

/// Body of the health response: exactly `{"status": "ok"}`.
///
/// Unknown keys are rejected on decode so the probe catches a drifting payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HealthStatus {
    pub status: Status,
}

impl HealthStatus {
    pub const fn ok() -> Self {
        Self { status: Status::Ok }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// `GET /health`: always returns 200 OK with `{"status": "ok"}`.
///
/// This endpoint has no dependencies and never blocks, making it safe to use
/// as a Docker / Kubernetes liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthStatus::ok()))
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn handler_returns_200_with_ok_body() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "status": "ok" }));
    }

    #[test]
    fn serializes_to_single_status_key() {
        let value = serde_json::to_value(HealthStatus::ok()).unwrap();
        assert_eq!(value, json!({ "status": "ok" }));
    }

    #[test]
    fn decode_rejects_extra_keys() {
        let result: Result<HealthStatus, _> =
            serde_json::from_value(json!({ "status": "ok", "uptime": 3 }));
        assert!(result.is_err());
    }

    #[test]
    fn decode_rejects_other_status_values() {
        let result: Result<HealthStatus, _> = serde_json::from_value(json!({ "status": "down" }));
        assert!(result.is_err());
    }

    #[test]
    fn decoded_ok_body_is_ok() {
        let status: HealthStatus = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(status.is_ok());
        assert_eq!(status, HealthStatus::ok());
    }
}

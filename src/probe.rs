//! Client side of the liveness check.
//!
//! `backend --healthcheck` runs [`probe`] against the local listener so a
//! container `HEALTHCHECK` needs no curl/wget in the image.

use std::time::Duration;

use anyhow::Context;

use crate::api::health::HealthStatus;

/// Timeout used by `--healthcheck`.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// GET `url` and require `200 OK` with exactly `{"status": "ok"}`.
pub async fn probe(url: &str, timeout: Duration) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("building probe client")?;

    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("requesting {url}"))?;

    let status = resp.status();
    anyhow::ensure!(
        status == reqwest::StatusCode::OK,
        "{url} returned {status}, expected 200 OK"
    );

    let body: HealthStatus = resp
        .json()
        .await
        .with_context(|| format!("decoding health response from {url}"))?;
    anyhow::ensure!(body.is_ok(), "{url} reported {body:?}");

    Ok(())
}

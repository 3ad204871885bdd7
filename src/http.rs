//! Shared HTTP plumbing for the service clients.

use anyhow::{bail, Result};
use std::time::Duration;

/// Build a client with the configured per-request timeout.
pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("tnsync/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Pass successful responses through; turn anything else into an error
/// carrying the status and the start of the body.
pub async fn ensure_success(
    resp: reqwest::Response,
    service: &str,
    operation: &str,
) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    bail!(
        "{} {} failed (HTTP {}): {}",
        service,
        operation,
        status,
        body.chars().take(500).collect::<String>()
    );
}

pub fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

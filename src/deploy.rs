//! Waiting for the static host after a push.
//!
//! Two strategies exist because both were in production use before this tool
//! unified them: a bounded poll that accepts only an exact HTTP 200, and a
//! single fixed sleep that assumes the host is fast enough. The caller
//! decides what an unreachable URL means; exhausting the poll here is not an
//! error.

use crate::config::DeployConfig;
use anyhow::{Context, Result};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP client for deploy checks. Redirects are not followed: a 3xx at the
/// polled URL must stay a 3xx instead of resolving to some other page's 200.
pub fn client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")
}

/// Wait for `url` to become publicly reachable according to the configured
/// strategy. Returns whether the URL was confirmed reachable.
///
/// Under `poll`, only an exact 200 counts; redirects, errors, and transport
/// failures all mean "not deployed yet". Under `fixed-wait` there is no
/// check at all, so the answer is always `true`.
pub async fn wait_for_deploy(
    client: &reqwest::Client,
    url: &str,
    config: &DeployConfig,
) -> Result<bool> {
    match config.strategy.as_str() {
        "fixed-wait" => {
            tokio::time::sleep(Duration::from_secs(config.wait_secs)).await;
            Ok(true)
        }
        _ => poll(client, url, config.attempts, config.interval_secs).await,
    }
}

async fn poll(client: &reqwest::Client, url: &str, attempts: u32, interval_secs: u64) -> Result<bool> {
    for attempt in 1..=attempts {
        if attempt > 1 {
            tokio::time::sleep(Duration::from_secs(interval_secs)).await;
        }

        match client.get(url).send().await {
            Ok(response) if response.status().as_u16() == 200 => return Ok(true),
            // Not an error: the host simply has not finished deploying.
            Ok(_) | Err(_) => continue,
        }
    }

    Ok(false)
}

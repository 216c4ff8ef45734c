//! Client for the read-later (bookmarking) API.
//!
//! One endpoint, one verb: POST a document reference (or inline HTML) and
//! get back the canonical reader URL. Authentication is a bearer token read
//! from the environment at command start; the token is passed around as a
//! value and never logged.

use crate::config::ReaderConfig;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Body of the save POST. Optional fields are omitted from the JSON rather
/// than sent as null.
#[derive(Debug, Clone, Serialize)]
pub struct SaveRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub location: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Inline document content, for the direct-send path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Ask the service to sanitize the inline HTML server-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_clean_html: Option<bool>,
}

/// Successful response; the service echoes back a canonical reader URL.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub url: Option<String>,
}

/// Read the bearer token from the configured environment variable.
pub fn resolve_token(config: &ReaderConfig) -> Result<String> {
    std::env::var(&config.token_env)
        .map_err(|_| anyhow::anyhow!("{} environment variable not set", config.token_env))
}

/// Split a comma-separated tag argument into a tag list; empty segments are
/// dropped. With no argument (or only empty segments) the configured
/// defaults apply.
pub fn parse_tags(arg: Option<&str>, defaults: &[String]) -> Vec<String> {
    let tags: Vec<String> = arg
        .unwrap_or("")
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if tags.is_empty() {
        defaults.to_vec()
    } else {
        tags
    }
}

pub fn client(config: &ReaderConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

/// Issue the single save POST. 200 and 201 are success; anything else is a
/// hard failure reported with the status and response body. There is no
/// retry: the caller's earlier side effects (commit, push) stand either way.
pub async fn save(
    client: &reqwest::Client,
    config: &ReaderConfig,
    token: &str,
    request: &SaveRequest,
) -> Result<SaveResponse> {
    let response = client
        .post(&config.endpoint)
        .header("Authorization", format!("Bearer {}", token))
        .json(request)
        .send()
        .await
        .with_context(|| format!("Failed to reach reader API at {}", config.endpoint))?;

    let status = response.status();
    if status.as_u16() == 200 || status.as_u16() == 201 {
        let saved: SaveResponse = response
            .json()
            .await
            .context("Reader API returned unparseable JSON")?;
        return Ok(saved);
    }

    let body = response.text().await.unwrap_or_default();
    bail!("Reader API error {}: {}", status, body.trim());
}

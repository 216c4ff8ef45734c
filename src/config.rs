use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
    #[serde(default)]
    pub reader: ReaderConfig,
}

/// Where the rendered pages end up once pushed.
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Public root under which the static host serves the HTML files.
    #[serde(default)]
    pub base_url: String,
    /// Raw VCS file root (e.g. a raw.githubusercontent.com prefix). Only the
    /// direct sender needs this; it gives inline HTML a stable URL.
    #[serde(default)]
    pub raw_base_url: String,
    #[serde(default = "default_remote")]
    pub remote: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            raw_base_url: String::new(),
            remote: default_remote(),
            branch: default_branch(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}
fn default_branch() -> String {
    "main".to_string()
}

/// How to wait for the static host after a push. The two strategies mirror
/// the two deploy-wait behaviors this tool replaced: a bounded poll for an
/// HTTP 200, and a single fixed sleep.
#[derive(Debug, Deserialize, Clone)]
pub struct DeployConfig {
    /// `poll` or `fixed-wait`.
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_wait_secs")]
    pub wait_secs: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            attempts: default_attempts(),
            interval_secs: default_interval_secs(),
            wait_secs: default_wait_secs(),
        }
    }
}

fn default_strategy() -> String {
    "poll".to_string()
}
fn default_attempts() -> u32 {
    60
}
fn default_interval_secs() -> u64 {
    1
}
fn default_wait_secs() -> u64 {
    2
}

/// The read-later service that receives the final bookmark POST.
#[derive(Debug, Deserialize, Clone)]
pub struct ReaderConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Name of the environment variable holding the bearer token. The value
    /// itself is resolved at command start and never written anywhere.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_tags")]
    pub default_tags: Vec<String>,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token_env: default_token_env(),
            default_tags: default_tags(),
            location: default_location(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "https://readwise.io/api/v3/save/".to_string()
}
fn default_token_env() -> String {
    "READWISE_TOKEN".to_string()
}
fn default_tags() -> Vec<String> {
    vec!["blog".to_string()]
}
fn default_location() -> String {
    "feed".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    match config.deploy.strategy.as_str() {
        "poll" | "fixed-wait" => {}
        other => anyhow::bail!(
            "Unknown deploy strategy: '{}'. Must be poll or fixed-wait.",
            other
        ),
    }

    if config.deploy.attempts == 0 {
        anyhow::bail!("deploy.attempts must be >= 1");
    }

    if !config.site.base_url.is_empty() {
        reqwest::Url::parse(&config.site.base_url).with_context(|| {
            format!("site.base_url is not a valid URL: {}", config.site.base_url)
        })?;
    }

    reqwest::Url::parse(&config.reader.endpoint).with_context(|| {
        format!(
            "reader.endpoint is not a valid URL: {}",
            config.reader.endpoint
        )
    })?;

    if config.reader.token_env.is_empty() {
        anyhow::bail!("reader.token_env must not be empty");
    }

    Ok(())
}

/// Commented starter config written by `quill init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"[site]
# Public root under which the static host serves your HTML files.
base_url = "https://example.github.io/notes"
# Raw VCS file root, used by `quill send` to give inline HTML a stable URL.
# raw_base_url = "https://raw.githubusercontent.com/you/notes/main"
remote = "origin"
branch = "main"

[deploy]
# "poll" checks the public URL until it returns 200; "fixed-wait" sleeps once.
strategy = "poll"
attempts = 60
interval_secs = 1
wait_secs = 2

[reader]
endpoint = "https://readwise.io/api/v3/save/"
token_env = "READWISE_TOKEN"
default_tags = ["blog"]
location = "feed"
timeout_secs = 30
"#;

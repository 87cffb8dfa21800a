use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub examples: ExamplesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_poll_interval_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    /// Number of retrieved passages the service should feed the generator.
    /// Sent as-is; the service owns range validation.
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// Advisory choice list shown in the chat help. Not enforced.
    #[serde(default = "default_top_k_choices")]
    pub top_k_choices: Vec<u32>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            top_k_choices: default_top_k_choices(),
        }
    }
}

fn default_top_k() -> u32 {
    5
}
fn default_top_k_choices() -> Vec<u32> {
    vec![1, 3, 5, 10]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExamplesConfig {
    /// Pause after each successfully ingested example, in milliseconds.
    /// Keeps the loader from hammering the service and lets the status
    /// line catch up between items.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    #[serde(default = "default_example_texts")]
    pub texts: Vec<String>,
}

impl Default for ExamplesConfig {
    fn default() -> Self {
        Self {
            pause_ms: default_pause_ms(),
            texts: default_example_texts(),
        }
    }
}

fn default_pause_ms() -> u64 {
    500
}

fn default_example_texts() -> Vec<String> {
    [
        "The capital of France is Paris.",
        "Brazil is the largest coffee producer in the world.",
        "Rust is a systems programming language focused on memory safety and performance.",
        "The Great Barrier Reef is the world's largest coral reef system.",
        "Machine learning is a subfield of artificial intelligence that lets computers learn from data without being explicitly programmed.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Load configuration from a TOML file, falling back to built-in defaults
/// when the file does not exist. A file that exists but fails to parse or
/// validate is an error — silent fallback would mask typos.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.api.base_url.trim().is_empty() {
        anyhow::bail!("api.base_url must not be empty");
    }
    if !config.api.base_url.starts_with("http://") && !config.api.base_url.starts_with("https://") {
        anyhow::bail!(
            "api.base_url must start with http:// or https://, got '{}'",
            config.api.base_url
        );
    }
    if config.api.timeout_secs == 0 {
        anyhow::bail!("api.timeout_secs must be > 0");
    }
    if config.api.poll_interval_secs == 0 {
        anyhow::bail!("api.poll_interval_secs must be > 0");
    }
    if config.examples.texts.is_empty() {
        anyhow::bail!("examples.texts must contain at least one entry");
    }

    Ok(config)
}

//! TOML configuration parsing and validation.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a working configuration that talks to the Hugging Face
//! Inference API with `t5-small`.
//!
//! ```toml
//! [fetch]
//! timeout_secs = 30
//!
//! [summarizer]
//! provider = "huggingface"
//! model = "t5-small"
//! default_length = 150
//! max_input_chars = 4000
//! oversize = "reject"
//!
//! [server]
//! bind = "127.0.0.1:8501"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::models::{SummaryLength, DEFAULT_SUMMARY_LENGTH, MIN_INPUT_CHARS};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_fetch_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!("content-summarizer/{}", env!("CARGO_PKG_VERSION"))
}

/// What to do with extracted text longer than `max_input_chars`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OversizePolicy {
    /// Fail the request with `SummarizationError::InputTooLong`.
    #[default]
    Reject,
    /// Cut the text down to the limit and summarize the prefix.
    Truncate,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummarizerConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    /// Base URL of the inference endpoint. Each provider has its own default.
    #[serde(default)]
    pub url: Option<String>,
    /// Name of the environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_model_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_length")]
    pub default_length: u32,
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
    #[serde(default)]
    pub oversize: OversizePolicy,
    /// Serialize model invocations behind a mutex.
    #[serde(default)]
    pub exclusive: bool,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            url: None,
            api_key_env: None,
            timeout_secs: default_model_timeout_secs(),
            default_length: default_length(),
            max_input_chars: default_max_input_chars(),
            oversize: OversizePolicy::default(),
            exclusive: false,
        }
    }
}

impl SummarizerConfig {
    /// The configured default length. Only valid after [`load_config`]
    /// has checked the range; falls back to the built-in default otherwise.
    pub fn default_summary_length(&self) -> SummaryLength {
        SummaryLength::new(self.default_length).unwrap_or_default()
    }
}

fn default_provider() -> String {
    "huggingface".to_string()
}
fn default_model_timeout_secs() -> u64 {
    120
}
fn default_length() -> u32 {
    DEFAULT_SUMMARY_LENGTH
}
fn default_max_input_chars() -> usize {
    4000
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}
fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

/// Load and validate the configuration at `path`.
///
/// A missing file is not an error: the built-in defaults are used instead.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.fetch.timeout_secs == 0 {
        bail!("fetch.timeout_secs must be > 0");
    }

    let summarizer = &config.summarizer;
    if summarizer.timeout_secs == 0 {
        bail!("summarizer.timeout_secs must be > 0");
    }
    if summarizer.max_input_chars < MIN_INPUT_CHARS {
        bail!(
            "summarizer.max_input_chars must be at least {}",
            MIN_INPUT_CHARS
        );
    }
    SummaryLength::new(summarizer.default_length)
        .with_context(|| "summarizer.default_length is invalid")?;

    match summarizer.provider.as_str() {
        "disabled" | "huggingface" | "ollama" => {}
        "openai" => {
            if summarizer.model.is_none() {
                bail!("summarizer.model must be specified when provider is 'openai'");
            }
        }
        other => bail!(
            "Unknown summarizer provider: '{}'. Must be disabled, huggingface, ollama, or openai.",
            other
        ),
    }

    if config.server.max_upload_bytes == 0 {
        bail!("server.max_upload_bytes must be > 0");
    }

    Ok(())
}

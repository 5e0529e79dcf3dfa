//! Runtime configuration for scripture providers and workbook validation.
//!
//! # Responsibility
//! - Hold provider endpoints and HTTP timeouts.
//! - Hold the wizard validation limits.
//!
//! # Invariants
//! - Base URLs are absolute `http`/`https` URLs without a trailing slash
//!   requirement; clients normalize them.
//! - `request_timeout_ms` is never zero.

use crate::scripture::registry::SourceRegistryError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const DEFAULT_CHAPTER_BASE_URL: &str = "https://bolls.life";
pub const DEFAULT_RANGE_BASE_URL: &str = "https://bible-api.com";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Configuration errors.
#[derive(Debug)]
pub enum ScriptureConfigError {
    InvalidBaseUrl { field: &'static str, value: String },
    ZeroTimeout,
    Parse(serde_json::Error),
    Client(reqwest::Error),
    Registry(SourceRegistryError),
}

impl Display for ScriptureConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBaseUrl { field, value } => {
                write!(f, "{field} must be an absolute http(s) url, got `{value}`")
            }
            Self::ZeroTimeout => write!(f, "request_timeout_ms must be > 0"),
            Self::Parse(err) => write!(f, "invalid scripture config: {err}"),
            Self::Client(err) => write!(f, "failed to build http client: {err}"),
            Self::Registry(err) => write!(f, "failed to register scripture source: {err}"),
        }
    }
}

impl Error for ScriptureConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Client(err) => Some(err),
            Self::Registry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ScriptureConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<SourceRegistryError> for ScriptureConfigError {
    fn from(value: SourceRegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<reqwest::Error> for ScriptureConfigError {
    fn from(value: reqwest::Error) -> Self {
        Self::Client(value)
    }
}

/// Scripture provider endpoints and transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptureConfig {
    /// Base URL of the chapter-oriented provider.
    pub chapter_base_url: String,
    /// Base URL of the range-oriented provider.
    pub range_base_url: String,
    pub request_timeout_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for ScriptureConfig {
    fn default() -> Self {
        Self {
            chapter_base_url: DEFAULT_CHAPTER_BASE_URL.to_string(),
            range_base_url: DEFAULT_RANGE_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            user_agent: None,
        }
    }
}

impl ScriptureConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ScriptureConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Points both providers at one base URL. Used against local test servers.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            chapter_base_url: base_url.clone(),
            range_base_url: base_url,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ScriptureConfigError> {
        check_base_url("chapter_base_url", &self.chapter_base_url)?;
        check_base_url("range_base_url", &self.range_base_url)?;
        if self.request_timeout_ms == 0 {
            return Err(ScriptureConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Builds the shared HTTP client for both providers.
    pub fn build_http_client(&self) -> Result<reqwest::Client, ScriptureConfigError> {
        self.validate()?;
        let mut builder = reqwest::Client::builder().timeout(self.request_timeout());
        if let Some(agent) = self.user_agent.as_deref() {
            builder = builder.user_agent(agent.to_string());
        }
        Ok(builder.build()?)
    }
}

fn check_base_url(field: &'static str, value: &str) -> Result<(), ScriptureConfigError> {
    let trimmed = value.trim();
    let valid = match reqwest::Url::parse(trimmed) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    };
    if !valid {
        return Err(ScriptureConfigError::InvalidBaseUrl {
            field,
            value: trimmed.to_string(),
        });
    }
    Ok(())
}

/// Limits enforced by the study wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Maximum observation items per lesson.
    pub max_observations: usize,
    pub min_segments: usize,
    pub max_segments: usize,
    /// Subject sentence limit in whitespace-separated words (English).
    pub max_subject_words: usize,
    /// Subject sentence limit in characters (Chinese).
    pub max_subject_chars: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_observations: 20,
            min_segments: 2,
            max_segments: 8,
            max_subject_words: 15,
            max_subject_chars: 30,
        }
    }
}

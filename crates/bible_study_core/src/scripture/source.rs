//! Scripture source SPI.
//!
//! # Responsibility
//! - Define the contract every scripture provider adapter implements.
//! - Classify provider failures for logging.
//!
//! # Invariants
//! - A source serves exactly one request shape (`SourceMode`); the other
//!   operation returns `FetchError::Unsupported`.
//! - Sources never retry; fallback is owned by `PassageFetcher`.

use crate::model::passage::Verse;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type FetchResult<T> = Result<T, FetchError>;

/// Request shape a source understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// One full chapter per call.
    Chapter,
    /// An arbitrary verse range per call.
    Range,
}

impl SourceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Range => "range",
        }
    }
}

/// Provider-level failure.
#[derive(Debug)]
pub enum FetchError {
    /// Network error, timeout or client failure.
    Transport(reqwest::Error),
    /// Non-success HTTP status.
    Status(u16),
    /// Body did not match the expected shape.
    Malformed(String),
    /// Request URL could not be built.
    InvalidRequest(String),
    Unsupported(SourceMode),
}

impl FetchError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status(_) => "http_status",
            Self::Malformed(_) => "malformed_payload",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Unsupported(_) => "unsupported",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "transport error: {err}"),
            Self::Status(status) => write!(f, "unexpected http status {status}"),
            Self::Malformed(details) => write!(f, "malformed response: {details}"),
            Self::InvalidRequest(details) => write!(f, "invalid request: {details}"),
            Self::Unsupported(mode) => {
                write!(f, "source does not serve {} requests", mode.as_str())
            }
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Scripture provider adapter.
#[async_trait]
pub trait ScriptureSource: Send + Sync {
    /// Stable registry id (`[a-z0-9_-]+`).
    fn provider_id(&self) -> &str;

    fn mode(&self) -> SourceMode;

    /// Full verse list of one chapter.
    async fn fetch_chapter(
        &self,
        _translation: &str,
        _book_id: u32,
        _chapter: u32,
    ) -> FetchResult<Vec<Verse>> {
        Err(FetchError::Unsupported(SourceMode::Chapter))
    }

    /// Verses of `book range`, e.g. `John` + `3:16-18`.
    async fn fetch_range(
        &self,
        _translation: &str,
        _book: &str,
        _range: &str,
    ) -> FetchResult<Vec<Verse>> {
        Err(FetchError::Unsupported(SourceMode::Range))
    }
}

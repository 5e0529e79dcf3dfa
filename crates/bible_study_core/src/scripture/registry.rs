//! In-process scripture source registry.

use crate::scripture::source::ScriptureSource;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Source registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRegistryError {
    InvalidProviderId(String),
    DuplicateProviderId(String),
}

impl Display for SourceRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProviderId(value) => write!(f, "provider id is invalid: {value}"),
            Self::DuplicateProviderId(value) => {
                write!(f, "provider id already registered: {value}")
            }
        }
    }
}

impl Error for SourceRegistryError {}

/// Scripture sources keyed by provider id.
#[derive(Default, Clone)]
pub struct SourceRegistry {
    sources: BTreeMap<String, Arc<dyn ScriptureSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one source adapter.
    pub fn register(&mut self, source: Arc<dyn ScriptureSource>) -> Result<(), SourceRegistryError> {
        let provider_id = source.provider_id().trim().to_string();
        if !is_valid_provider_id(&provider_id) {
            return Err(SourceRegistryError::InvalidProviderId(provider_id));
        }
        if self.sources.contains_key(provider_id.as_str()) {
            return Err(SourceRegistryError::DuplicateProviderId(provider_id));
        }

        self.sources.insert(provider_id, source);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Returns sorted provider ids.
    pub fn provider_ids(&self) -> Vec<String> {
        self.sources.keys().cloned().collect()
    }

    /// Returns one source by id.
    pub fn get(&self, provider_id: &str) -> Option<Arc<dyn ScriptureSource>> {
        self.sources.get(provider_id.trim()).cloned()
    }
}

fn is_valid_provider_id(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

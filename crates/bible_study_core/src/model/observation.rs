//! Observation item model.
//!
//! # Responsibility
//! - Represent user notes anchored to an end verse inside a passage.
//! - Own the persisted reference notation `start – end`.
//!
//! # Invariants
//! - `id` is unique within one study record.
//! - `reference.end` is always known; `reference.start` is `None` until the
//!   whole list is reindexed against the passage verses.

use crate::model::passage::{ReferenceParseError, VerseRef};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

const RANGE_SEPARATOR: &str = " – ";
const UNRESOLVED_MARKER: &str = "?";

/// Verse span an observation covers.
///
/// Serialized as `"c:v – c:v"`, or `"? – c:v"` while the start is unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObservationRef {
    pub start: Option<VerseRef>,
    pub end: VerseRef,
}

impl ObservationRef {
    /// Reference known only by its end verse.
    pub fn unresolved(end: VerseRef) -> Self {
        Self { start: None, end }
    }

    pub fn resolved(start: VerseRef, end: VerseRef) -> Self {
        Self {
            start: Some(start),
            end,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.start.is_some()
    }
}

impl Display for ObservationRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.start {
            Some(start) => write!(f, "{start}{RANGE_SEPARATOR}{}", self.end),
            None => write!(f, "{UNRESOLVED_MARKER}{RANGE_SEPARATOR}{}", self.end),
        }
    }
}

impl FromStr for ObservationRef {
    type Err = ReferenceParseError;

    /// Accepts `start – end`, `? – end` and a bare `end`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let Some((start, end)) = trimmed.split_once(RANGE_SEPARATOR.trim()) else {
            return Ok(Self::unresolved(trimmed.parse()?));
        };

        let end = end.parse::<VerseRef>()?;
        let start = start.trim();
        if start == UNRESOLVED_MARKER || start.is_empty() {
            return Ok(Self::unresolved(end));
        }
        Ok(Self::resolved(start.parse()?, end))
    }
}

impl TryFrom<String> for ObservationRef {
    type Error = ReferenceParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObservationRef> for String {
    fn from(value: ObservationRef) -> Self {
        value.to_string()
    }
}

/// User-authored note anchored to a passage range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationItem {
    pub id: String,
    pub text: String,
    #[serde(rename = "ref")]
    pub reference: ObservationRef,
}

impl ObservationItem {
    /// Creates an empty note anchored at `end` with a generated id.
    pub fn new(end: VerseRef) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), end)
    }

    /// Creates an empty note with a caller-provided id.
    pub fn with_id(id: impl Into<String>, end: VerseRef) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            reference: ObservationRef::unresolved(end),
        }
    }
}

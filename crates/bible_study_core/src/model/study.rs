//! Study workbook records.
//!
//! # Responsibility
//! - Hold the five wizard steps of one lesson's homework.
//! - Hold the locally stored, unverified user identity.
//!
//! # Invariants
//! - One `StudyData` per `lesson_id`.
//! - `step5` is keyed by `Segment::id`.
//! - Timestamps are Unix epoch milliseconds.

use crate::model::observation::ObservationItem;
use crate::model::passage::VerseRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Passage division authored in the segmentation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub start_chapter: u32,
    pub start_verse: u32,
    pub end_chapter: u32,
    pub end_verse: u32,
    pub summary: String,
}

impl Segment {
    /// Creates an empty single-verse segment at `at` with a generated id.
    pub fn starting_at(at: VerseRef) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start_chapter: at.chapter,
            start_verse: at.verse,
            end_chapter: at.chapter,
            end_verse: at.verse,
            summary: String::new(),
        }
    }

    pub fn start(&self) -> VerseRef {
        VerseRef::new(self.start_chapter, self.start_verse)
    }

    pub fn end(&self) -> VerseRef {
        VerseRef::new(self.end_chapter, self.end_verse)
    }
}

/// Homework record for one lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyData {
    pub lesson_id: u32,
    /// Observation list.
    pub step1: Vec<ObservationItem>,
    /// Segmentation.
    pub step2: Vec<Segment>,
    /// Subject sentence.
    pub step3: String,
    /// Aim.
    pub step4: String,
    /// Application per segment id.
    pub step5: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<i64>,
    pub last_updated: i64,
}

impl StudyData {
    /// Empty record for `lesson_id`, stamped with the current time.
    pub fn new(lesson_id: u32) -> Self {
        Self {
            lesson_id,
            step1: Vec::new(),
            step2: Vec::new(),
            step3: String::new(),
            step4: String::new(),
            step5: BTreeMap::new(),
            submitted_at: None,
            last_updated: now_epoch_ms(),
        }
    }

    /// Refreshes `last_updated`.
    pub fn touch(&mut self) {
        self.last_updated = now_epoch_ms();
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    pub fn application_for(&self, segment_id: &str) -> Option<&str> {
        self.step5.get(segment_id).map(String::as_str)
    }
}

/// Profile validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    EmptyName,
    EmptyEmail,
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "profile name cannot be empty"),
            Self::EmptyEmail => write!(f, "profile email cannot be empty"),
        }
    }
}

impl Error for ProfileValidationError {}

/// Locally stored identity. Not verified against any service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub access_count: u64,
    /// Accumulated usage in seconds.
    #[serde(default)]
    pub total_usage_duration: u64,
}

impl UserProfile {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, ProfileValidationError> {
        let profile = Self {
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            picture: String::new(),
            access_count: 0,
            total_usage_duration: 0,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProfileValidationError::EmptyName);
        }
        if self.email.trim().is_empty() {
            return Err(ProfileValidationError::EmptyEmail);
        }
        Ok(())
    }
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

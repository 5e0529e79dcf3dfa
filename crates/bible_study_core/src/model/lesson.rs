//! Lesson definitions and curriculum lookup.

use crate::model::passage::Passage;
use serde::{Deserialize, Serialize};

/// One weekly lesson and the passage it studies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: u32,
    pub title_en: String,
    pub title_zh: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<Passage>,
    #[serde(default)]
    pub is_optional: bool,
    /// Monday of the assigned week, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_start: Option<String>,
}

/// Ordered lesson list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curriculum {
    lessons: Vec<Lesson>,
}

impl Curriculum {
    pub fn new(lessons: Vec<Lesson>) -> Self {
        Self { lessons }
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, id: u32) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id == id)
    }

    /// Lesson whose `week_start` matches `week_start` exactly.
    pub fn lesson_for_week(&self, week_start: &str) -> Option<&Lesson> {
        let week_start = week_start.trim();
        self.lessons
            .iter()
            .find(|lesson| lesson.week_start.as_deref() == Some(week_start))
    }
}

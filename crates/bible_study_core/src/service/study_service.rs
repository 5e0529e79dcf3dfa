//! Study workbook use-case service.
//!
//! # Responsibility
//! - Apply wizard edits to a lesson's record and persist them locally.
//! - Keep observation ranges consistent with the passage verse list.
//!
//! # Invariants
//! - Every mutation refreshes `last_updated` and saves the full record.
//! - Observation membership changes always go through a full `reindex`.
//! - `submit` only stamps `submitted_at` when no step has issues.

use crate::config::ValidationRules;
use crate::model::observation::ObservationItem;
use crate::model::passage::{LanguageVariant, Verse, VerseRef};
use crate::model::study::{now_epoch_ms, Segment, StudyData};
use crate::reindex::{next_segment_start, reindex};
use crate::repo::study_repo::StudyRepository;
use crate::repo::RepoError;
use crate::service::validation::{validate_all, validate_step, StudyIssue, WizardStep};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for study use-cases.
#[derive(Debug)]
pub enum StudyServiceError {
    ObservationLimitReached { max: usize },
    ObservationNotFound(String),
    SegmentNotFound(String),
    /// Submission blocked by validation issues.
    Incomplete(Vec<StudyIssue>),
    Repo(RepoError),
}

impl Display for StudyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ObservationLimitReached { max } => {
                write!(f, "observation list is limited to {max} items")
            }
            Self::ObservationNotFound(id) => write!(f, "observation not found: {id}"),
            Self::SegmentNotFound(id) => write!(f, "segment not found: {id}"),
            Self::Incomplete(issues) => {
                write!(f, "study is incomplete: {} issue(s)", issues.len())?;
                if let Some(first) = issues.first() {
                    write!(f, "; first: {first}")?;
                }
                Ok(())
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StudyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StudyServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type StudyServiceResult<T> = Result<T, StudyServiceError>;

/// Study service facade over repository implementations.
pub struct StudyService<R: StudyRepository> {
    repo: R,
    rules: ValidationRules,
}

impl<R: StudyRepository> StudyService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_rules(repo, ValidationRules::default())
    }

    pub fn with_rules(repo: R, rules: ValidationRules) -> Self {
        Self { repo, rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Stored record for `lesson_id`, or a fresh unsaved one.
    pub fn load_or_init(&self, lesson_id: u32) -> StudyServiceResult<StudyData> {
        Ok(self
            .repo
            .load_study(lesson_id)?
            .unwrap_or_else(|| StudyData::new(lesson_id)))
    }

    /// Anchors a new empty observation at `at` and reindexes the list.
    pub fn add_observation(
        &self,
        lesson_id: u32,
        at: VerseRef,
        verses: &[Verse],
    ) -> StudyServiceResult<StudyData> {
        let mut data = self.load_or_init(lesson_id)?;
        if data.step1.len() >= self.rules.max_observations {
            return Err(StudyServiceError::ObservationLimitReached {
                max: self.rules.max_observations,
            });
        }

        let mut items = std::mem::take(&mut data.step1);
        items.push(ObservationItem::new(at));
        data.step1 = reindex(items, verses);
        self.persist(data)
    }

    /// Removes one observation and reindexes the remaining list.
    pub fn remove_observation(
        &self,
        lesson_id: u32,
        item_id: &str,
        verses: &[Verse],
    ) -> StudyServiceResult<StudyData> {
        let mut data = self.load_or_init(lesson_id)?;
        let before = data.step1.len();
        let items: Vec<ObservationItem> = std::mem::take(&mut data.step1)
            .into_iter()
            .filter(|item| item.id != item_id)
            .collect();
        if items.len() == before {
            return Err(StudyServiceError::ObservationNotFound(item_id.to_string()));
        }

        data.step1 = reindex(items, verses);
        self.persist(data)
    }

    /// Replaces one observation's text. Ranges are untouched.
    pub fn update_observation_text(
        &self,
        lesson_id: u32,
        item_id: &str,
        text: impl Into<String>,
    ) -> StudyServiceResult<StudyData> {
        let mut data = self.load_or_init(lesson_id)?;
        let item = data
            .step1
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| StudyServiceError::ObservationNotFound(item_id.to_string()))?;
        item.text = text.into();
        self.persist(data)
    }

    /// Appends an empty single-verse segment after the last one.
    pub fn add_segment(&self, lesson_id: u32, verses: &[Verse]) -> StudyServiceResult<StudyData> {
        let mut data = self.load_or_init(lesson_id)?;
        let start = next_segment_start(&data.step2, verses);
        data.step2.push(Segment::starting_at(start));
        self.persist(data)
    }

    /// Replaces the segment with the same id.
    pub fn update_segment(&self, lesson_id: u32, segment: Segment) -> StudyServiceResult<StudyData> {
        let mut data = self.load_or_init(lesson_id)?;
        let slot = data
            .step2
            .iter_mut()
            .find(|existing| existing.id == segment.id)
            .ok_or_else(|| StudyServiceError::SegmentNotFound(segment.id.clone()))?;
        *slot = segment;
        self.persist(data)
    }

    /// Removes one segment. Its application text, if any, is kept in `step5`.
    pub fn remove_segment(&self, lesson_id: u32, segment_id: &str) -> StudyServiceResult<StudyData> {
        let mut data = self.load_or_init(lesson_id)?;
        let before = data.step2.len();
        data.step2.retain(|segment| segment.id != segment_id);
        if data.step2.len() == before {
            return Err(StudyServiceError::SegmentNotFound(segment_id.to_string()));
        }
        self.persist(data)
    }

    pub fn set_subject(
        &self,
        lesson_id: u32,
        subject: impl Into<String>,
    ) -> StudyServiceResult<StudyData> {
        let mut data = self.load_or_init(lesson_id)?;
        data.step3 = subject.into();
        self.persist(data)
    }

    pub fn set_aim(&self, lesson_id: u32, aim: impl Into<String>) -> StudyServiceResult<StudyData> {
        let mut data = self.load_or_init(lesson_id)?;
        data.step4 = aim.into();
        self.persist(data)
    }

    /// Sets the application question for an existing segment.
    pub fn set_application(
        &self,
        lesson_id: u32,
        segment_id: &str,
        text: impl Into<String>,
    ) -> StudyServiceResult<StudyData> {
        let mut data = self.load_or_init(lesson_id)?;
        if !data.step2.iter().any(|segment| segment.id == segment_id) {
            return Err(StudyServiceError::SegmentNotFound(segment_id.to_string()));
        }
        data.step5.insert(segment_id.to_string(), text.into());
        self.persist(data)
    }

    pub fn validate_step(
        &self,
        data: &StudyData,
        step: WizardStep,
        lang: LanguageVariant,
    ) -> Vec<StudyIssue> {
        validate_step(data, step, lang, &self.rules)
    }

    pub fn validate_all(&self, data: &StudyData, lang: LanguageVariant) -> Vec<StudyIssue> {
        validate_all(data, lang, &self.rules)
    }

    /// Marks the lesson submitted when every step validates.
    pub fn submit(&self, lesson_id: u32, lang: LanguageVariant) -> StudyServiceResult<StudyData> {
        let mut data = self.load_or_init(lesson_id)?;
        let issues = self.validate_all(&data, lang);
        if !issues.is_empty() {
            return Err(StudyServiceError::Incomplete(issues));
        }

        data.submitted_at = Some(now_epoch_ms());
        let data = self.persist(data)?;
        info!(
            "event=study_submit module=service status=ok lesson_id={} observation_count={} segment_count={}",
            data.lesson_id,
            data.step1.len(),
            data.step2.len()
        );
        Ok(data)
    }

    fn persist(&self, mut data: StudyData) -> StudyServiceResult<StudyData> {
        data.touch();
        self.repo.save_study(&data)?;
        Ok(data)
    }
}

//! Wizard step validation.
//!
//! # Invariants
//! - Validation never mutates the record.
//! - Subject length counts characters for Chinese and whitespace-separated
//!   words otherwise.

use crate::config::ValidationRules;
use crate::model::passage::LanguageVariant;
use crate::model::study::StudyData;
use std::fmt::{Display, Formatter};

/// The five analytical steps plus the final review screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Observation,
    Segmentation,
    Subject,
    Aim,
    Application,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        Self::Observation,
        Self::Segmentation,
        Self::Subject,
        Self::Aim,
        Self::Application,
        Self::Review,
    ];

    pub fn next(self) -> Option<Self> {
        let index = Self::ALL.iter().position(|step| *step == self)?;
        Self::ALL.get(index + 1).copied()
    }
}

/// One blocking problem found in a study record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyIssue {
    SegmentCountOutOfRange { count: usize, min: usize, max: usize },
    EmptySegmentSummary { segment_id: String },
    EmptySubject,
    SubjectTooLong { count: usize, max: usize },
    EmptyAim,
    MissingApplication { segment_id: String },
}

impl Display for StudyIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SegmentCountOutOfRange { count, min, max } => {
                write!(f, "require {min}-{max} segments, found {count}")
            }
            Self::EmptySegmentSummary { segment_id } => {
                write!(f, "segment {segment_id} summary cannot be empty")
            }
            Self::EmptySubject => write!(f, "subject cannot be empty"),
            Self::SubjectTooLong { count, max } => {
                write!(f, "subject length {count} exceeds {max}")
            }
            Self::EmptyAim => write!(f, "aim cannot be empty"),
            Self::MissingApplication { segment_id } => {
                write!(f, "segment {segment_id} needs an application question")
            }
        }
    }
}

/// Subject length in the unit the language is limited by.
pub fn subject_length(subject: &str, lang: LanguageVariant) -> usize {
    let trimmed = subject.trim();
    if lang.is_chinese() {
        trimmed.chars().count()
    } else {
        trimmed.split_whitespace().count()
    }
}

/// Issues blocking progress past `step`.
pub fn validate_step(
    data: &StudyData,
    step: WizardStep,
    lang: LanguageVariant,
    rules: &ValidationRules,
) -> Vec<StudyIssue> {
    let mut issues = Vec::new();
    match step {
        WizardStep::Observation | WizardStep::Review => {}
        WizardStep::Segmentation => {
            let count = data.step2.len();
            if count < rules.min_segments || count > rules.max_segments {
                issues.push(StudyIssue::SegmentCountOutOfRange {
                    count,
                    min: rules.min_segments,
                    max: rules.max_segments,
                });
            }
            issues.extend(
                data.step2
                    .iter()
                    .filter(|segment| segment.summary.trim().is_empty())
                    .map(|segment| StudyIssue::EmptySegmentSummary {
                        segment_id: segment.id.clone(),
                    }),
            );
        }
        WizardStep::Subject => {
            let max = if lang.is_chinese() {
                rules.max_subject_chars
            } else {
                rules.max_subject_words
            };
            let count = subject_length(&data.step3, lang);
            if count == 0 {
                issues.push(StudyIssue::EmptySubject);
            } else if count > max {
                issues.push(StudyIssue::SubjectTooLong { count, max });
            }
        }
        WizardStep::Aim => {
            if data.step4.trim().is_empty() {
                issues.push(StudyIssue::EmptyAim);
            }
        }
        WizardStep::Application => {
            issues.extend(
                data.step2
                    .iter()
                    .filter(|segment| {
                        data.application_for(&segment.id)
                            .map_or(true, |text| text.trim().is_empty())
                    })
                    .map(|segment| StudyIssue::MissingApplication {
                        segment_id: segment.id.clone(),
                    }),
            );
        }
    }
    issues
}

/// Issues across every step, in wizard order.
pub fn validate_all(
    data: &StudyData,
    lang: LanguageVariant,
    rules: &ValidationRules,
) -> Vec<StudyIssue> {
    WizardStep::ALL
        .iter()
        .flat_map(|step| validate_step(data, *step, lang, rules))
        .collect()
}

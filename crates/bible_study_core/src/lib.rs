//! Core logic for the weekly Bible-study workbook.
//!
//! Owns scripture retrieval with provider fallback, observation range
//! recalculation, wizard validation and local persistence. Rendering, export
//! and cloud sync live outside this crate.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reindex;
pub mod repo;
pub mod scripture;
pub mod service;

pub use config::{ScriptureConfig, ScriptureConfigError, ValidationRules};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::lesson::{Curriculum, Lesson};
pub use model::observation::{ObservationItem, ObservationRef};
pub use model::passage::{
    LanguageVariant, Passage, PassageValidationError, ReferenceParseError, Verse, VerseRef,
};
pub use model::study::{ProfileValidationError, Segment, StudyData, UserProfile};
pub use reindex::{next_segment_start, position_of, reindex};
pub use repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
pub use repo::study_repo::{SqliteStudyRepository, StudyRepository, SubmissionSummary};
pub use repo::{RepoError, RepoResult};
pub use scripture::{
    BookTable, FallbackTable, FetchError, FetchOutcome, PassageFetcher, ProviderAttempt,
    ScriptureSource, SourceMode, SourceRegistry,
};
pub use service::study_service::{StudyService, StudyServiceError, StudyServiceResult};
pub use service::validation::{StudyIssue, WizardStep};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Local-first persistence for study records and the user profile.
//!
//! # Responsibility
//! - Define storage contracts used by services.
//! - Keep SQLite details out of use-case code.
//!
//! # Invariants
//! - One stored record per lesson; saves replace the whole record.
//! - Read paths reject payloads that no longer deserialize instead of
//!   masking them.

use crate::db::DbError;
use crate::model::study::ProfileValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod profile_repo;
pub mod study_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error shared by repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidProfile(ProfileValidationError),
    NotFound(u32),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "study payload (de)serialization failed: {err}"),
            Self::InvalidProfile(err) => write!(f, "{err}"),
            Self::NotFound(lesson_id) => write!(f, "study record not found: lesson {lesson_id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidProfile(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<ProfileValidationError> for RepoError {
    fn from(value: ProfileValidationError) -> Self {
        Self::InvalidProfile(value)
    }
}

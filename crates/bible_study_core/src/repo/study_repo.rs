//! Study record repository.
//!
//! Records are stored as one JSON payload per lesson, mirroring the
//! `study_{lesson_id}` documents the workbook keeps locally.

use crate::model::study::StudyData;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Submission index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionSummary {
    pub lesson_id: u32,
    pub submitted_at: i64,
}

/// Storage contract for per-lesson homework records.
pub trait StudyRepository {
    fn load_study(&self, lesson_id: u32) -> RepoResult<Option<StudyData>>;
    /// Inserts or fully replaces the record for `data.lesson_id`.
    fn save_study(&self, data: &StudyData) -> RepoResult<()>;
    fn delete_study(&self, lesson_id: u32) -> RepoResult<()>;
    /// Submitted lessons ordered by `lesson_id`.
    fn list_submissions(&self) -> RepoResult<Vec<SubmissionSummary>>;
}

/// SQLite-backed study repository.
pub struct SqliteStudyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudyRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StudyRepository for SqliteStudyRepository<'_> {
    fn load_study(&self, lesson_id: u32) -> RepoResult<Option<StudyData>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM study_records WHERE lesson_id = ?1;",
                [lesson_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };
        let data: StudyData = serde_json::from_str(&payload)?;
        if data.lesson_id != lesson_id {
            return Err(RepoError::InvalidData(format!(
                "record for lesson {lesson_id} carries lessonId {}",
                data.lesson_id
            )));
        }
        Ok(Some(data))
    }

    fn save_study(&self, data: &StudyData) -> RepoResult<()> {
        let payload = serde_json::to_string(data)?;
        self.conn.execute(
            "INSERT INTO study_records (lesson_id, payload, submitted_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(lesson_id) DO UPDATE SET
                payload = excluded.payload,
                submitted_at = excluded.submitted_at,
                updated_at = excluded.updated_at;",
            params![data.lesson_id, payload, data.submitted_at, data.last_updated],
        )?;
        Ok(())
    }

    fn delete_study(&self, lesson_id: u32) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM study_records WHERE lesson_id = ?1;", [lesson_id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(lesson_id));
        }
        Ok(())
    }

    fn list_submissions(&self) -> RepoResult<Vec<SubmissionSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT lesson_id, submitted_at
             FROM study_records
             WHERE submitted_at IS NOT NULL
             ORDER BY lesson_id ASC;",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SubmissionSummary {
                lesson_id: row.get(0)?,
                submitted_at: row.get(1)?,
            })
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }
}

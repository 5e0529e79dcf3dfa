//! Local user profile repository (single row).

use crate::model::study::{now_epoch_ms, UserProfile};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Storage contract for the local, unverified identity.
pub trait ProfileRepository {
    fn load_profile(&self) -> RepoResult<Option<UserProfile>>;
    /// Validates and replaces the stored profile.
    fn save_profile(&self, profile: &UserProfile) -> RepoResult<()>;
    /// Bumps `access_count` and adds `duration_secs` of usage.
    ///
    /// Returns the updated profile, or `None` when no profile is stored.
    fn record_access(&self, duration_secs: u64) -> RepoResult<Option<UserProfile>>;
}

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn load_profile(&self) -> RepoResult<Option<UserProfile>> {
        let profile = self
            .conn
            .query_row(
                "SELECT name, email, picture, access_count, total_usage_duration
                 FROM user_profile WHERE id = 1;",
                [],
                |row| {
                    Ok(UserProfile {
                        name: row.get(0)?,
                        email: row.get(1)?,
                        picture: row.get(2)?,
                        access_count: row.get(3)?,
                        total_usage_duration: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    fn save_profile(&self, profile: &UserProfile) -> RepoResult<()> {
        profile.validate()?;
        self.conn.execute(
            "INSERT INTO user_profile
                (id, name, email, picture, access_count, total_usage_duration, updated_at)
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                picture = excluded.picture,
                access_count = excluded.access_count,
                total_usage_duration = excluded.total_usage_duration,
                updated_at = excluded.updated_at;",
            params![
                profile.name.trim(),
                profile.email.trim(),
                profile.picture.as_str(),
                profile.access_count,
                profile.total_usage_duration,
                now_epoch_ms(),
            ],
        )?;
        Ok(())
    }

    fn record_access(&self, duration_secs: u64) -> RepoResult<Option<UserProfile>> {
        let changed = self.conn.execute(
            "UPDATE user_profile
             SET
                access_count = access_count + 1,
                total_usage_duration = total_usage_duration + ?1,
                updated_at = ?2
             WHERE id = 1;",
            params![duration_secs, now_epoch_ms()],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.load_profile()
    }
}

// sessions.rs - Login sessions.
//
// The caller gets the raw token once; the table only keeps its SHA-256.

use bingo_board::token;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::Store;

impl Store {
    /// Start a session for `user_id` and return the bearer token.
    pub fn create_session(
        &self,
        user_id: Uuid,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let raw = token::generate_token();
        self.db.execute(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![token::hash_token(&raw), user_id, now, now + ttl],
        )?;
        Ok(raw)
    }

    /// The user behind an unexpired session token.
    pub fn resolve_session(
        &self,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, StoreError> {
        Ok(self
            .db
            .query_row(
                "SELECT user_id FROM sessions WHERE token_hash = ?1 AND expires_at > ?2",
                params![token::hash_token(raw), now],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub fn delete_session(&self, raw: &str) -> Result<bool, StoreError> {
        let n = self.db.execute(
            "DELETE FROM sessions WHERE token_hash = ?1",
            params![token::hash_token(raw)],
        )?;
        Ok(n > 0)
    }

    /// Drop sessions that expired at or before `now`. Returns how many.
    pub fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let n = self
            .db
            .execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?;
        if n > 0 {
            tracing::info!(purged = n, "removed expired sessions");
        }
        Ok(n)
    }
}

// store.rs - Store: the SQLite connection and schema.
//
// One connection per Store. The schema is created idempotently on open;
// there are no versioned migrations. Ids are stored as 16-byte UUID blobs,
// timestamps as sortable UTC text.

use std::fs;
use std::path::Path;

use rusqlite::Connection;

use crate::error::StoreError;

/// Persistent store for users, groups, boards, goals, invitations and
/// sessions.
pub struct Store {
    pub(crate) db: Connection,
}

impl Store {
    const SCHEMA: &'static str = r"
        CREATE TABLE IF NOT EXISTS users (
            id BLOB PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            avatar_url TEXT,
            provider TEXT NOT NULL,
            provider_account_id TEXT NOT NULL,
            invited_by BLOB REFERENCES users(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS friend_groups (
            id BLOB PRIMARY KEY,
            owner_id BLOB NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS group_members (
            id BLOB PRIMARY KEY,
            group_id BLOB NOT NULL REFERENCES friend_groups(id) ON DELETE CASCADE,
            user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            role TEXT NOT NULL CHECK (role IN ('owner', 'member')),
            joined_at TEXT NOT NULL,
            UNIQUE (group_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS boards (
            id BLOB PRIMARY KEY,
            user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            year INTEGER NOT NULL,
            locked INTEGER NOT NULL DEFAULT 0,
            share_token TEXT NOT NULL UNIQUE,
            is_public INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS goals (
            id BLOB PRIMARY KEY,
            board_id BLOB NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
            position INTEGER NOT NULL CHECK (position BETWEEN 0 AND 24),
            text TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            completed_at TEXT,
            is_free_space INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (board_id, position)
        );

        CREATE TABLE IF NOT EXISTS invitations (
            id BLOB PRIMARY KEY,
            inviter_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            invite_token TEXT NOT NULL UNIQUE,
            email TEXT,
            used_by BLOB REFERENCES users(id) ON DELETE SET NULL,
            used_at TEXT,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        -- Only the SHA-256 of a session token is kept.
        CREATE TABLE IF NOT EXISTS sessions (
            token_hash TEXT PRIMARY KEY,
            user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_boards_user ON boards(user_id);
        CREATE INDEX IF NOT EXISTS idx_group_members_user ON group_members(user_id);
        CREATE INDEX IF NOT EXISTS idx_invitations_inviter ON invitations(inviter_id);
        CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
    ";

    /// Open or create the store database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let db = Connection::open(path)?;
        db.execute_batch("PRAGMA journal_mode=WAL;")?;
        tracing::debug!(path = %path.display(), "opened store");
        Self::initialize(db)
    }

    /// Open an in-memory store (for tests).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(db: Connection) -> Result<Self, StoreError> {
        db.execute_batch("PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000;")?;
        db.execute_batch(Self::SCHEMA)?;
        Ok(Self { db })
    }
}

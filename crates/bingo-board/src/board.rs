// board.rs - Board: a titled, year-tagged 5x5 grid owned by one user.
//
// A board starts unlocked so its owner can fill in the grid. Locking is a
// one-way transition that requires all 25 cells to hold a goal:
//
//   Unlocked → Locked        (only when filled)
//   Locked   → Unlocked      (rejected)
//
// Sharing is independent of locking. Every board carries an opaque share
// token from creation; the token only grants access while `is_public` is set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bingo::CELL_COUNT;
use crate::error::BoardError;
use crate::token;

pub const MIN_YEAR: i64 = 2000;
pub const MAX_YEAR: i64 = 2100;

/// One bingo board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    pub id: Uuid,

    /// Owner of the board.
    pub user_id: Uuid,

    pub title: String,

    pub year: i32,

    /// Once set, goals can only be toggled complete.
    pub locked: bool,

    /// Opaque token for read-only public links.
    pub share_token: String,

    pub is_public: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Result of a lock request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockTransition {
    /// The board moved from unlocked to locked.
    Locked,
    /// Nothing changed.
    Unchanged,
}

impl Board {
    /// Create an unlocked, private board after validating title and year.
    pub fn new(user_id: Uuid, title: &str, year: i64) -> Result<Self, BoardError> {
        let title = validate_title(title)?;
        let year = validate_year(year)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            year,
            locked: false,
            share_token: token::generate_token(),
            is_public: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Change title and year. Allowed on locked boards too.
    pub fn rename(&mut self, title: &str, year: i64) -> Result<(), BoardError> {
        let title = validate_title(title)?;
        let year = validate_year(year)?;
        self.title = title;
        self.year = year;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Apply a lock request given how many cells currently hold a goal.
    pub fn request_lock(
        &mut self,
        locked: bool,
        filled: usize,
    ) -> Result<LockTransition, BoardError> {
        match (self.locked, locked) {
            (true, true) | (false, false) => Ok(LockTransition::Unchanged),
            (true, false) => Err(BoardError::CannotUnlock),
            (false, true) => {
                if filled < CELL_COUNT {
                    return Err(BoardError::NotFilled {
                        missing: CELL_COUNT - filled,
                    });
                }
                self.locked = true;
                self.updated_at = Utc::now();
                Ok(LockTransition::Locked)
            }
        }
    }

    /// Toggle public visibility. Returns whether anything changed.
    pub fn set_public(&mut self, is_public: bool) -> bool {
        if self.is_public == is_public {
            return false;
        }
        self.is_public = is_public;
        self.updated_at = Utc::now();
        true
    }

    /// A share token only opens the board while it is public.
    pub fn grants_share_access(&self, share_token: &str) -> bool {
        self.is_public && token::tokens_match(&self.share_token, share_token)
    }

    /// Path (relative to the public base URL) of the read-only share link.
    pub fn share_path(&self) -> String {
        format!("/board/{}?share={}", self.id, self.share_token)
    }
}

/// Trim and require a non-empty title.
pub fn validate_title(title: &str) -> Result<String, BoardError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(BoardError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

pub fn validate_year(year: i64) -> Result<i32, BoardError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(BoardError::InvalidYear { year });
    }
    Ok(year as i32)
}

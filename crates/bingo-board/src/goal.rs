// goal.rs - Goal: the text and completion state of one grid cell.
//
// Editing rules:
// - Free-space goals are born completed and never change afterwards.
// - On a locked board only `completed` may change.
// - `completed_at` tracks `completed`: set to now when completed, cleared
//   when reopened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bingo::CELL_COUNT;
use crate::error::BoardError;

/// The centre cell, where a free space goes by default.
pub const FREE_SPACE_POSITION: u8 = 12;

pub const FREE_SPACE_TEXT: &str = "FREE SPACE";

/// One cell of a board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goal {
    pub id: Uuid,
    pub board_id: Uuid,

    /// 0-24, row-major.
    pub position: u8,

    pub text: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,

    /// Auto-completed cell that cannot be edited or deleted.
    pub is_free_space: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A partial update to a goal. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalEdit {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub is_free_space: Option<bool>,
}

impl GoalEdit {
    /// Does this edit touch anything besides completion?
    fn changes_content(&self) -> bool {
        self.text.is_some() || self.is_free_space == Some(true)
    }
}

impl Goal {
    /// An open goal at `position`. Callers are expected to have validated
    /// the position; see [`Goal::create`].
    pub fn new(board_id: Uuid, position: u8, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            position,
            text: text.into(),
            completed: false,
            completed_at: None,
            is_free_space: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate user input and build a goal. Free spaces start completed.
    pub fn create(
        board_id: Uuid,
        position: i64,
        text: &str,
        is_free_space: bool,
    ) -> Result<Self, BoardError> {
        let position = validate_position(position)?;
        let text = validate_goal_text(text)?;
        let mut goal = Self::new(board_id, position, text);
        if is_free_space {
            goal.make_free_space();
        }
        Ok(goal)
    }

    /// The centre free-space cell added when a board is created with one.
    pub fn free_space(board_id: Uuid) -> Self {
        let mut goal = Self::new(board_id, FREE_SPACE_POSITION, FREE_SPACE_TEXT);
        goal.make_free_space();
        goal
    }

    pub fn set_completed(&mut self, completed: bool) {
        let now = Utc::now();
        self.completed = completed;
        self.completed_at = completed.then_some(now);
        self.updated_at = now;
    }

    fn make_free_space(&mut self) {
        self.is_free_space = true;
        self.set_completed(true);
    }

    /// Apply `edit`, validating everything before mutating.
    ///
    /// Returns `true` when the edit newly completes the goal, i.e. the
    /// caller should check for a new bingo. Re-sending the current
    /// completion state is a no-op and keeps `completed_at`.
    pub fn apply(&mut self, edit: &GoalEdit, board_locked: bool) -> Result<bool, BoardError> {
        if self.is_free_space {
            return Err(BoardError::FreeSpaceImmutable { action: "modify" });
        }
        if board_locked && edit.changes_content() {
            return Err(BoardError::Locked);
        }
        let text = edit.text.as_deref().map(validate_goal_text).transpose()?;

        if let Some(text) = text {
            self.text = text;
            self.updated_at = Utc::now();
        }
        if edit.is_free_space == Some(true) {
            self.make_free_space();
            return Ok(true);
        }
        match edit.completed {
            Some(completed) if completed == self.completed => Ok(false),
            Some(completed) => {
                self.set_completed(completed);
                Ok(completed)
            }
            None => Ok(false),
        }
    }

    /// Check that this goal may be removed from its board.
    pub fn ensure_deletable(&self, board_locked: bool) -> Result<(), BoardError> {
        if self.is_free_space {
            return Err(BoardError::FreeSpaceImmutable { action: "delete" });
        }
        if board_locked {
            return Err(BoardError::Locked);
        }
        Ok(())
    }
}

pub fn validate_position(position: i64) -> Result<u8, BoardError> {
    if !(0..CELL_COUNT as i64).contains(&position) {
        return Err(BoardError::InvalidPosition { position });
    }
    Ok(position as u8)
}

/// Trim and require non-empty goal text.
pub fn validate_goal_text(text: &str) -> Result<String, BoardError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(BoardError::EmptyGoalText);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal() -> Goal {
        Goal::create(Uuid::new_v4(), 3, "  Run a marathon ", false).unwrap()
    }

    #[test]
    fn create_trims_and_validates() {
        let g = goal();
        assert_eq!(g.text, "Run a marathon");
        assert_eq!(g.position, 3);
        assert!(!g.completed);
        assert!(g.completed_at.is_none());

        let board = Uuid::new_v4();
        assert!(matches!(
            Goal::create(board, -1, "x", false),
            Err(BoardError::InvalidPosition { position: -1 })
        ));
        assert!(matches!(
            Goal::create(board, 25, "x", false),
            Err(BoardError::InvalidPosition { .. })
        ));
        assert!(matches!(
            Goal::create(board, 0, "  ", false),
            Err(BoardError::EmptyGoalText)
        ));
        assert!(Goal::create(board, 24, "x", false).is_ok());
    }

    #[test]
    fn free_space_is_created_completed() {
        let g = Goal::free_space(Uuid::new_v4());
        assert_eq!(g.position, FREE_SPACE_POSITION);
        assert_eq!(g.text, FREE_SPACE_TEXT);
        assert!(g.is_free_space);
        assert!(g.completed);
        assert!(g.completed_at.is_some());

        let g = Goal::create(Uuid::new_v4(), 7, "Rest day", true).unwrap();
        assert!(g.is_free_space && g.completed);
    }

    #[test]
    fn completing_sets_and_clears_timestamp() {
        let mut g = goal();
        let edit = GoalEdit {
            completed: Some(true),
            ..Default::default()
        };
        assert!(g.apply(&edit, false).unwrap());
        assert!(g.completed);
        assert!(g.completed_at.is_some());

        let edit = GoalEdit {
            completed: Some(false),
            ..Default::default()
        };
        assert!(!g.apply(&edit, false).unwrap());
        assert!(!g.completed);
        assert!(g.completed_at.is_none());
    }

    #[test]
    fn recompleting_keeps_timestamp_and_is_not_an_event() {
        let mut g = goal();
        let edit = GoalEdit {
            completed: Some(true),
            ..Default::default()
        };
        assert!(g.apply(&edit, false).unwrap());
        let first = g.completed_at;

        assert!(!g.apply(&edit, false).unwrap());
        assert!(g.completed);
        assert_eq!(g.completed_at, first);
    }

    #[test]
    fn free_space_cannot_be_modified_or_deleted() {
        let mut g = Goal::free_space(Uuid::new_v4());
        let edit = GoalEdit {
            completed: Some(false),
            ..Default::default()
        };
        let err = g.apply(&edit, false).unwrap_err();
        assert_eq!(err.to_string(), "Cannot modify free space goal");
        assert!(g.completed);

        let err = g.ensure_deletable(false).unwrap_err();
        assert_eq!(err.to_string(), "Cannot delete free space goal");
    }

    #[test]
    fn locked_board_only_allows_completion() {
        let mut g = goal();
        let text_edit = GoalEdit {
            text: Some("New text".into()),
            ..Default::default()
        };
        assert!(matches!(g.apply(&text_edit, true), Err(BoardError::Locked)));
        assert_eq!(g.text, "Run a marathon");

        let free_edit = GoalEdit {
            is_free_space: Some(true),
            ..Default::default()
        };
        assert!(matches!(g.apply(&free_edit, true), Err(BoardError::Locked)));

        let done = GoalEdit {
            completed: Some(true),
            is_free_space: Some(false),
            ..Default::default()
        };
        assert!(g.apply(&done, true).unwrap());
        assert!(g.completed);

        assert!(matches!(g.ensure_deletable(true), Err(BoardError::Locked)));
        assert!(g.ensure_deletable(false).is_ok());
    }

    #[test]
    fn empty_text_edit_is_rejected_without_side_effects() {
        let mut g = goal();
        let edit = GoalEdit {
            text: Some("   ".into()),
            completed: Some(true),
            ..Default::default()
        };
        assert!(matches!(g.apply(&edit, false), Err(BoardError::EmptyGoalText)));
        assert!(!g.completed);
    }

    #[test]
    fn marking_as_free_space_completes_the_goal() {
        let mut g = goal();
        let edit = GoalEdit {
            text: Some("Day off".into()),
            is_free_space: Some(true),
            completed: Some(false),
        };
        assert!(g.apply(&edit, false).unwrap());
        assert!(g.is_free_space);
        assert!(g.completed);
        assert_eq!(g.text, "Day off");
    }

    #[test]
    fn edit_deserializes_with_missing_fields() {
        let edit: GoalEdit = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert_eq!(edit.completed, Some(true));
        assert!(edit.text.is_none());
        assert!(edit.is_free_space.is_none());
    }
}

// goals.rs - Goal rows.

use bingo_board::{Board, Goal};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::error::{is_unique_violation, StoreError};
use crate::store::Store;

const GOAL_COLUMNS: &str = "id, board_id, position, text, completed, completed_at, \
     is_free_space, created_at, updated_at";

fn goal_from_row(row: &Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get("id")?,
        board_id: row.get("board_id")?,
        position: row.get("position")?,
        text: row.get("text")?,
        completed: row.get("completed")?,
        completed_at: row.get("completed_at")?,
        is_free_space: row.get("is_free_space")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl Store {
    /// Insert a goal. A second goal at the same cell is
    /// [`StoreError::PositionTaken`].
    pub fn insert_goal(&self, goal: &Goal) -> Result<(), StoreError> {
        self.db
            .execute(
                "INSERT INTO goals (id, board_id, position, text, completed, completed_at,
                                    is_free_space, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    goal.id,
                    goal.board_id,
                    goal.position,
                    goal.text,
                    goal.completed,
                    goal.completed_at,
                    goal.is_free_space,
                    goal.created_at,
                    goal.updated_at,
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::PositionTaken {
                        board_id: goal.board_id,
                        position: goal.position,
                    }
                } else {
                    StoreError::Database(e)
                }
            })?;
        Ok(())
    }

    pub fn get_goal(&self, id: Uuid) -> Result<Option<Goal>, StoreError> {
        let sql = format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1");
        Ok(self
            .db
            .query_row(&sql, params![id], goal_from_row)
            .optional()?)
    }

    /// A goal together with the board it sits on.
    pub fn get_goal_with_board(&self, id: Uuid) -> Result<Option<(Goal, Board)>, StoreError> {
        let Some(goal) = self.get_goal(id)? else {
            return Ok(None);
        };
        Ok(self.get_board(goal.board_id)?.map(|board| (goal, board)))
    }

    /// All goals of a board in grid order.
    pub fn list_goals(&self, board_id: Uuid) -> Result<Vec<Goal>, StoreError> {
        let sql = format!("SELECT {GOAL_COLUMNS} FROM goals WHERE board_id = ?1 ORDER BY position");
        let mut stmt = self.db.prepare(&sql)?;
        let rows = stmt.query_map(params![board_id], goal_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count_goals(&self, board_id: Uuid) -> Result<usize, StoreError> {
        let n: i64 = self.db.query_row(
            "SELECT COUNT(*) FROM goals WHERE board_id = ?1",
            params![board_id],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    pub fn update_goal(&self, goal: &Goal) -> Result<(), StoreError> {
        self.db.execute(
            "UPDATE goals SET text = ?2, completed = ?3, completed_at = ?4,
                              is_free_space = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                goal.id,
                goal.text,
                goal.completed,
                goal.completed_at,
                goal.is_free_space,
                goal.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn delete_goal(&self, id: Uuid) -> Result<bool, StoreError> {
        let n = self
            .db
            .execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }
}

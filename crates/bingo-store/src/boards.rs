// boards.rs - Board rows.

use bingo_board::{Board, Goal};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::Store;

const BOARD_COLUMNS: &str = "id, user_id, title, year, locked, share_token, is_public, \
     created_at, updated_at";

fn board_from_row(row: &Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        year: row.get("year")?,
        locked: row.get("locked")?,
        share_token: row.get("share_token")?,
        is_public: row.get("is_public")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl Store {
    /// Insert a board, together with its free-space goal when given, in one
    /// transaction.
    pub fn insert_board(&self, board: &Board, free_space: Option<&Goal>) -> Result<(), StoreError> {
        let tx = self.db.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO boards (id, user_id, title, year, locked, share_token, is_public,
                                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                board.id,
                board.user_id,
                board.title,
                board.year,
                board.locked,
                board.share_token,
                board.is_public,
                board.created_at,
                board.updated_at,
            ],
        )?;
        if let Some(goal) = free_space {
            self.insert_goal(goal)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_board(&self, id: Uuid) -> Result<Option<Board>, StoreError> {
        let sql = format!("SELECT {BOARD_COLUMNS} FROM boards WHERE id = ?1");
        Ok(self
            .db
            .query_row(&sql, params![id], board_from_row)
            .optional()?)
    }

    /// Boards owned by `user_id`, newest year first, then newest created.
    pub fn list_boards_for_user(&self, user_id: Uuid) -> Result<Vec<Board>, StoreError> {
        let sql = format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE user_id = ?1
             ORDER BY year DESC, created_at DESC"
        );
        let mut stmt = self.db.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id], board_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Persist every mutable column of `board`.
    pub fn update_board(&self, board: &Board) -> Result<(), StoreError> {
        self.db.execute(
            "UPDATE boards SET title = ?2, year = ?3, locked = ?4, is_public = ?5,
                               updated_at = ?6
             WHERE id = ?1",
            params![
                board.id,
                board.title,
                board.year,
                board.locked,
                board.is_public,
                board.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Persist `board.locked`. The column only ever moves to true.
    pub fn set_board_locked(&self, board: &Board) -> Result<(), StoreError> {
        self.db.execute(
            "UPDATE boards SET locked = ?2, updated_at = ?3 WHERE id = ?1 AND locked = 0",
            params![board.id, board.locked, board.updated_at],
        )?;
        Ok(())
    }

    pub fn set_board_public(&self, board: &Board) -> Result<(), StoreError> {
        self.db.execute(
            "UPDATE boards SET is_public = ?2, updated_at = ?3 WHERE id = ?1",
            params![board.id, board.is_public, board.updated_at],
        )?;
        Ok(())
    }

    /// Delete a board and, by cascade, its goals. Returns whether a row went.
    pub fn delete_board(&self, id: Uuid) -> Result<bool, StoreError> {
        let n = self
            .db
            .execute("DELETE FROM boards WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }
}

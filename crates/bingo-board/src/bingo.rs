// bingo.rs - Line detection over the fixed 5x5 grid.
//
// Positions are numbered row-major: `position = row * 5 + col`.
//
//    0  1  2  3  4
//    5  6  7  8  9
//   10 11 12 13 14
//   15 16 17 18 19
//   20 21 22 23 24
//
// Everything here is pure: callers hand in the goals they loaded and get
// back which lines are complete.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::goal::Goal;

/// Width (and height) of a board.
pub const GRID_SIZE: u8 = 5;

/// Number of cells on a board.
pub const CELL_COUNT: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

/// Top-left to bottom-right.
const MAIN_DIAGONAL: [u8; 5] = [0, 6, 12, 18, 24];

/// Top-right to bottom-left.
const ANTI_DIAGONAL: [u8; 5] = [4, 8, 12, 16, 20];

/// The kind of line that produced a bingo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BingoKind {
    Row,
    Column,
    Diagonal,
}

impl fmt::Display for BingoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BingoKind::Row => write!(f, "row"),
            BingoKind::Column => write!(f, "column"),
            BingoKind::Diagonal => write!(f, "diagonal"),
        }
    }
}

/// A single completed line.
///
/// Rows and columns are indexed 0-4. Diagonal 0 runs from the top-left
/// corner, diagonal 1 from the top-right corner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BingoLine {
    #[serde(rename = "type")]
    pub kind: BingoKind,
    pub index: u8,
}

impl BingoLine {
    pub fn row(index: u8) -> Self {
        Self {
            kind: BingoKind::Row,
            index,
        }
    }

    pub fn column(index: u8) -> Self {
        Self {
            kind: BingoKind::Column,
            index,
        }
    }

    pub fn diagonal(index: u8) -> Self {
        Self {
            kind: BingoKind::Diagonal,
            index,
        }
    }

    /// The five positions that make up this line, or `None` when the index
    /// does not name a line on the grid.
    pub fn positions(&self) -> Option<[u8; 5]> {
        match (self.kind, self.index) {
            (BingoKind::Row, i) if i < GRID_SIZE => {
                Some(std::array::from_fn(|c| i * GRID_SIZE + c as u8))
            }
            (BingoKind::Column, i) if i < GRID_SIZE => {
                Some(std::array::from_fn(|r| r as u8 * GRID_SIZE + i))
            }
            (BingoKind::Diagonal, 0) => Some(MAIN_DIAGONAL),
            (BingoKind::Diagonal, 1) => Some(ANTI_DIAGONAL),
            _ => None,
        }
    }
}

/// Position -> completed lookup for one board.
///
/// A position with no goal counts as incomplete. Goals whose position is
/// outside 0-24 are ignored, and when two goals claim the same position the
/// later one wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionGrid {
    present: [bool; CELL_COUNT],
    completed: [bool; CELL_COUNT],
}

impl CompletionGrid {
    pub fn from_goals<'a>(goals: impl IntoIterator<Item = &'a Goal>) -> Self {
        let mut grid = Self::default();
        for goal in goals {
            grid.set(goal.position, goal.completed);
        }
        grid
    }

    /// Record the state of one cell. Out-of-range positions are dropped.
    pub fn set(&mut self, position: u8, completed: bool) {
        let idx = position as usize;
        if idx < CELL_COUNT {
            self.present[idx] = true;
            self.completed[idx] = completed;
        }
    }

    pub fn is_completed(&self, position: u8) -> bool {
        self.completed
            .get(position as usize)
            .copied()
            .unwrap_or(false)
    }

    /// A line that is not on the grid is never complete.
    pub fn line_complete(&self, line: BingoLine) -> bool {
        line.positions()
            .is_some_and(|cells| cells.iter().all(|p| self.is_completed(*p)))
    }

    /// All 25 positions present and completed.
    pub fn is_full(&self) -> bool {
        self.present.iter().all(|p| *p) && self.completed.iter().all(|c| *c)
    }

    /// See [`check_for_new_bingo`].
    pub fn new_bingo_at(&self, position: u8) -> Option<BingoKind> {
        if position as usize >= CELL_COUNT {
            return None;
        }
        let row = position / GRID_SIZE;
        let col = position % GRID_SIZE;

        if self.line_complete(BingoLine::row(row)) {
            return Some(BingoKind::Row);
        }
        if self.line_complete(BingoLine::column(col)) {
            return Some(BingoKind::Column);
        }
        let on_main = row == col;
        let on_anti = row + col == GRID_SIZE - 1;
        if (on_main && self.line_complete(BingoLine::diagonal(0)))
            || (on_anti && self.line_complete(BingoLine::diagonal(1)))
        {
            return Some(BingoKind::Diagonal);
        }
        None
    }

    /// See [`all_bingos`].
    pub fn lines(&self) -> Vec<BingoLine> {
        (0..GRID_SIZE)
            .map(BingoLine::row)
            .chain((0..GRID_SIZE).map(BingoLine::column))
            .chain([BingoLine::diagonal(0), BingoLine::diagonal(1)])
            .filter(|line| self.line_complete(*line))
            .collect()
    }
}

/// Check whether the cell at `completed_position` finished a line.
///
/// Only lines passing through that position are considered. When several
/// complete at once the row wins over the column, and the column over a
/// diagonal.
pub fn check_for_new_bingo(goals: &[Goal], completed_position: u8) -> Option<BingoKind> {
    CompletionGrid::from_goals(goals).new_bingo_at(completed_position)
}

/// A board is complete when all 25 positions hold a completed goal.
pub fn is_board_complete(goals: &[Goal]) -> bool {
    CompletionGrid::from_goals(goals).is_full()
}

/// Every completed line: rows 0-4, then columns 0-4, then both diagonals.
pub fn all_bingos(goals: &[Goal]) -> Vec<BingoLine> {
    CompletionGrid::from_goals(goals).lines()
}

/// What a completion event achieved.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub bingo: Option<BingoKind>,
    pub board_complete: bool,
}

impl CompletionOutcome {
    /// Evaluate the board after the goal at `position` was completed.
    pub fn evaluate(goals: &[Goal], position: u8) -> Self {
        let grid = CompletionGrid::from_goals(goals);
        Self {
            bingo: grid.new_bingo_at(position),
            board_complete: grid.is_full(),
        }
    }
}

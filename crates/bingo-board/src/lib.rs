//! # bingo-board
//!
//! Boards, goals and bingo detection.
//!
//! A [`Board`] is a 5×5 grid of yearly [`Goal`]s owned by one user. This
//! crate holds the rules that do not depend on storage: input validation,
//! the one-way lock, free-space handling, line detection over the grid and
//! the celebration cues that follow a completion.
//!
//! ## Key components
//!
//! - [`bingo`]: row/column/diagonal detection ([`check_for_new_bingo`],
//!   [`is_board_complete`], [`all_bingos`])
//! - [`Board`] and [`Goal`]: validated records with their editing rules
//! - [`celebration_sequence`]: ordered animation cues for a completion
//! - [`BoardEvent`] and [`EventDispatcher`]: notifications for sinks
//! - [`token`]: opaque share/session tokens

pub mod bingo;
pub mod board;
pub mod celebration;
pub mod error;
pub mod events;
pub mod goal;
pub mod token;

pub use bingo::{
    all_bingos, check_for_new_bingo, is_board_complete, BingoKind, BingoLine, CompletionGrid,
    CompletionOutcome, CELL_COUNT,
};
pub use board::{Board, LockTransition};
pub use celebration::{celebration_sequence, CelebrationCue, CelebrationKind, Intensity};
pub use error::BoardError;
pub use events::{
    BoardEvent, EventDispatcher, EventFilter, LogSink, NotificationSink, TracingSink,
};
pub use goal::{Goal, GoalEdit, FREE_SPACE_POSITION, FREE_SPACE_TEXT};

// error.rs - Error types for board and goal rules.
//
// The Display strings double as the user-facing messages returned by the
// HTTP API, so keep them short and in sentence case.

use thiserror::Error;

/// Errors raised while validating or mutating boards and goals.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Valid year is required (2000-2100)")]
    InvalidYear { year: i64 },

    #[error("Goal text is required")]
    EmptyGoalText,

    #[error("Position must be between 0 and 24")]
    InvalidPosition { position: i64 },

    /// Locking needs every cell filled.
    #[error("Cannot lock board. Please add {missing} more goal(s).")]
    NotFilled { missing: usize },

    #[error("Locked boards cannot be unlocked")]
    CannotUnlock,

    /// Goals on a locked board can only be toggled complete.
    #[error("Board is locked; goals can only be marked complete")]
    Locked,

    #[error("Cannot {action} free space goal")]
    FreeSpaceImmutable { action: &'static str },

    /// A file I/O operation failed (event log sinks).
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BoardError {
    /// True for errors caused by the caller's input rather than the system.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            BoardError::IoError { .. } | BoardError::SerializationError(_)
        )
    }
}

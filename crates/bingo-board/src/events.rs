// events.rs - Board events and notification dispatch.
//
// Handlers emit a BoardEvent at the moments worth recording: a board was
// created, locked or shared, a goal was completed, a line or the whole
// board was finished, an invitation was redeemed. Sinks decide what to do
// with them. The dispatcher is synchronous and never fails the caller.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bingo::BingoKind;
use crate::error::BoardError;

/// Events emitted by the board service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum BoardEvent {
    BoardCreated {
        board_id: Uuid,
        user_id: Uuid,
        title: String,
        year: i32,
        timestamp: DateTime<Utc>,
    },

    BoardLocked {
        board_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    BoardVisibilityChanged {
        board_id: Uuid,
        is_public: bool,
        timestamp: DateTime<Utc>,
    },

    GoalCompleted {
        board_id: Uuid,
        goal_id: Uuid,
        position: u8,
        timestamp: DateTime<Utc>,
    },

    BingoAchieved {
        board_id: Uuid,
        kind: BingoKind,
        position: u8,
        timestamp: DateTime<Utc>,
    },

    BoardCompleted {
        board_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    InvitationRedeemed {
        invitation_id: Uuid,
        inviter_id: Uuid,
        redeemed_by: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl BoardEvent {
    /// Every value [`event_type`](Self::event_type) can return.
    pub const KINDS: [&'static str; 7] = [
        "board_created",
        "board_locked",
        "board_visibility_changed",
        "goal_completed",
        "bingo_achieved",
        "board_completed",
        "invitation_redeemed",
    ];

    pub fn event_type(&self) -> &'static str {
        match self {
            BoardEvent::BoardCreated { .. } => "board_created",
            BoardEvent::BoardLocked { .. } => "board_locked",
            BoardEvent::BoardVisibilityChanged { .. } => "board_visibility_changed",
            BoardEvent::GoalCompleted { .. } => "goal_completed",
            BoardEvent::BingoAchieved { .. } => "bingo_achieved",
            BoardEvent::BoardCompleted { .. } => "board_completed",
            BoardEvent::InvitationRedeemed { .. } => "invitation_redeemed",
        }
    }

    pub fn board_created(board_id: Uuid, user_id: Uuid, title: &str, year: i32) -> Self {
        BoardEvent::BoardCreated {
            board_id,
            user_id,
            title: title.to_string(),
            year,
            timestamp: Utc::now(),
        }
    }

    pub fn board_locked(board_id: Uuid) -> Self {
        BoardEvent::BoardLocked {
            board_id,
            timestamp: Utc::now(),
        }
    }

    pub fn visibility_changed(board_id: Uuid, is_public: bool) -> Self {
        BoardEvent::BoardVisibilityChanged {
            board_id,
            is_public,
            timestamp: Utc::now(),
        }
    }

    pub fn goal_completed(board_id: Uuid, goal_id: Uuid, position: u8) -> Self {
        BoardEvent::GoalCompleted {
            board_id,
            goal_id,
            position,
            timestamp: Utc::now(),
        }
    }

    pub fn bingo_achieved(board_id: Uuid, kind: BingoKind, position: u8) -> Self {
        BoardEvent::BingoAchieved {
            board_id,
            kind,
            position,
            timestamp: Utc::now(),
        }
    }

    pub fn board_completed(board_id: Uuid) -> Self {
        BoardEvent::BoardCompleted {
            board_id,
            timestamp: Utc::now(),
        }
    }

    pub fn invitation_redeemed(invitation_id: Uuid, inviter_id: Uuid, redeemed_by: Uuid) -> Self {
        BoardEvent::InvitationRedeemed {
            invitation_id,
            inviter_id,
            redeemed_by,
            timestamp: Utc::now(),
        }
    }
}

/// Receives board events.
pub trait NotificationSink: Send + Sync {
    /// Short name used when the dispatcher reports a failure.
    fn name(&self) -> &'static str;

    fn send(&self, event: &BoardEvent) -> Result<(), BoardError>;
}

/// JSONL event log: one serialized event per line, appended.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl NotificationSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    fn send(&self, event: &BoardEvent) -> Result<(), BoardError> {
        let line = serde_json::to_string(event)?;
        self.append_line(&line).map_err(|source| BoardError::IoError {
            path: self.path.display().to_string(),
            source,
        })
    }
}

/// Writes each event as a structured `tracing` line.
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn name(&self) -> &'static str {
        "tracing"
    }

    fn send(&self, event: &BoardEvent) -> Result<(), BoardError> {
        let payload = serde_json::to_string(event)?;
        tracing::info!(event_type = event.event_type(), %payload, "board event");
        Ok(())
    }
}

/// Which event types a sink subscribes to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventFilter {
    #[default]
    All,
    Only(Vec<String>),
}

impl EventFilter {
    /// An empty list means every event.
    pub fn from_kinds(kinds: &[String]) -> Self {
        if kinds.is_empty() {
            EventFilter::All
        } else {
            EventFilter::Only(kinds.to_vec())
        }
    }

    pub fn accepts(&self, event: &BoardEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Only(kinds) => kinds.iter().any(|k| k == event.event_type()),
        }
    }
}

/// Routes each event to the sinks whose filter accepts it.
///
/// Dispatch never fails the caller: a sink error is logged and the
/// remaining sinks still run.
#[derive(Default)]
pub struct EventDispatcher {
    routes: Vec<(EventFilter, Box<dyn NotificationSink>)>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `sink` to every event.
    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.subscribe(EventFilter::All, sink);
    }

    pub fn subscribe(&mut self, filter: EventFilter, sink: Box<dyn NotificationSink>) {
        self.routes.push((filter, sink));
    }

    pub fn dispatch(&self, event: &BoardEvent) {
        let event_type = event.event_type();
        for (_, sink) in self.routes.iter().filter(|(f, _)| f.accepts(event)) {
            if let Err(e) = sink.send(event) {
                tracing::warn!(
                    sink = sink.name(),
                    event_type,
                    error = %e,
                    "notification sink failed"
                );
            }
        }
    }
}

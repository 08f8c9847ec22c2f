// celebration.rs - Ordering of the feedback shown after a goal is completed.
//
// The server decides *what* to celebrate and in which order; clients only
// play the cues. A completion always gets the small burst, a new line gets
// the medium one half a second later, and a finished board gets the big
// one after a full second.

use serde::{Deserialize, Serialize};

use crate::bingo::CompletionOutcome;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CelebrationKind {
    Goal,
    Bingo,
    Board,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Small,
    Medium,
    Large,
}

/// One animation trigger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CelebrationCue {
    pub kind: CelebrationKind,
    pub intensity: Intensity,
    /// Delay after the completion response, in milliseconds.
    pub delay_ms: u64,
    /// How long the effect should run; 0 means a single burst.
    pub duration_ms: u64,
}

impl CelebrationCue {
    const GOAL: Self = Self {
        kind: CelebrationKind::Goal,
        intensity: Intensity::Small,
        delay_ms: 0,
        duration_ms: 0,
    };

    const BINGO: Self = Self {
        kind: CelebrationKind::Bingo,
        intensity: Intensity::Medium,
        delay_ms: 500,
        duration_ms: 2_000,
    };

    const BOARD: Self = Self {
        kind: CelebrationKind::Board,
        intensity: Intensity::Large,
        delay_ms: 1_000,
        duration_ms: 5_000,
    };
}

/// Cues for a completion event, in playback order.
pub fn celebration_sequence(outcome: &CompletionOutcome) -> Vec<CelebrationCue> {
    let mut cues = vec![CelebrationCue::GOAL];
    if outcome.bingo.is_some() {
        cues.push(CelebrationCue::BINGO);
    }
    if outcome.board_complete {
        cues.push(CelebrationCue::BOARD);
    }
    cues
}

use serde::{Deserialize, Serialize};

use crate::format::format_mm_ss;
use crate::timer::{CompletedSession, TimerState};

/// Every timer state change produces an Event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    RecordingStarted,
    Ticked {
        elapsed_secs: u64,
    },
    RecordingStopped {
        session: CompletedSession,
    },
}

/// What the presentation layer renders for the timer.
///
/// `revision` increases on every published change, including edits to the
/// sink that leave the timer itself untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: TimerState,
    pub elapsed_secs: u64,
    /// `MM:SS`
    pub elapsed_display: String,
    #[serde(default)]
    pub revision: u64,
}

impl Snapshot {
    pub fn new(state: TimerState, elapsed_secs: u64) -> Self {
        Self {
            state,
            elapsed_secs,
            elapsed_display: format_mm_ss(elapsed_secs),
            revision: 0,
        }
    }

    pub fn recording(&self) -> bool {
        self.state == TimerState::Recording
    }
}

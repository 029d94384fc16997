//! Meal timer state machine.
//!
//! The timer counts ticks; it does not own a thread or read the clock while
//! running. A host (see [`TimerController`](super::TimerController)) calls
//! `tick()` once per second while recording, and passes the wall-clock stop
//! time into `stop()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Recording -> (stop: session handed to sink) -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = MealTimer::new(MealLog::new());
//! timer.start();
//! // Once per second:
//! timer.tick();
//! timer.stop(clock.now()); // Returns Some(Event::RecordingStopped { .. })
//! ```

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::session::{CompletedSession, SessionSink};
use crate::events::{Event, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Recording,
}

/// Start/stop meal timer feeding completed sessions into a sink.
#[derive(Debug, Clone)]
pub struct MealTimer<S> {
    state: TimerState,
    elapsed_secs: u64,
    sink: S,
}

impl<S: SessionSink> MealTimer<S> {
    /// Create an idle timer with the given sink.
    pub fn new(sink: S) -> Self {
        Self {
            state: TimerState::Idle,
            elapsed_secs: 0,
            sink,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == TimerState::Recording
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.state, self.elapsed_secs)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin recording. Returns `None` if already recording.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Recording;
                self.elapsed_secs = 0;
                Some(Event::RecordingStarted)
            }
            TimerState::Recording => None,
        }
    }

    /// Advance one second. Ignored while idle.
    pub fn tick(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Recording => {
                self.elapsed_secs = self.elapsed_secs.saturating_add(1);
                Some(Event::Ticked {
                    elapsed_secs: self.elapsed_secs,
                })
            }
            TimerState::Idle => None,
        }
    }

    /// Finish the session at `now`, hand it to the sink and return to idle.
    pub fn stop(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        match self.state {
            TimerState::Recording => {
                let session = CompletedSession::ending_at(now, self.elapsed_secs);
                self.sink.on_session(&session);
                self.state = TimerState::Idle;
                self.elapsed_secs = 0;
                Some(Event::RecordingStopped { session })
            }
            TimerState::Idle => None,
        }
    }

    /// The single start/stop button.
    pub fn toggle(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        match self.state {
            TimerState::Idle => self.start(),
            TimerState::Recording => self.stop(now),
        }
    }
}

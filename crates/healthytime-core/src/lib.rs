//! # HealthyTime Core Library
//!
//! This library provides the core logic for HealthyTime, a meal-duration
//! tracker. Screens (or the CLI) are thin layers over the same core: they
//! issue user actions and render the state the core publishes.
//!
//! ## Architecture
//!
//! - **Meal Timer**: A tick-counting state machine (`Idle -> Recording -> Idle`)
//!   that hands every completed session to an injected [`SessionSink`]
//! - **Meal Log**: Newest-first in-memory record list with retroactive edits
//!   and a two-step delete
//! - **Daily Tally**: The Home screen's running total and meal count
//! - **Timer Controller**: Async host owning the one scoped 1-second ticker
//! - **Stats**: Per-day totals and per-meal-type breakdowns for charts
//! - **Storage**: TOML-based configuration only; meal data is never persisted
//!
//! ## Key Components
//!
//! - [`MealTimer`]: Core timer state machine
//! - [`MealLog`]: Record store for the Record screen
//! - [`TimerController`]: Ticker lifecycle and snapshot publishing
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod collab;
pub mod error;
pub mod events;
pub mod format;
pub mod meal;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use collab::{ImagePicker, ImageRequest, NavCommand, NavigationStack, Navigator, PickOutcome, Route};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::{Event, Snapshot};
pub use format::format_mm_ss;
pub use meal::{classify, MealLog, MealRecord, MealType};
pub use stats::{daily_breakdown, weekly_totals, DayTotal, MealTypeTotal, MAX_STATS_DAYS};
pub use storage::Config;
pub use timer::{CompletedSession, DailyTally, MealTimer, SessionSink, TimerController, TimerState};

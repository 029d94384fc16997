mod controller;
mod engine;
mod session;

pub use controller::{TimerController, DEFAULT_TICK_INTERVAL};
pub use engine::{MealTimer, TimerState};
pub use session::{CompletedSession, DailyTally, SessionSink};

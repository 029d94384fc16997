//! Async host for a [`MealTimer`] with its one-second ticker.
//!
//! The ticker is a tokio task spawned on entering `Recording`. Its
//! `JoinHandle` is the cancellation handle: it is aborted on stop and when
//! the controller is dropped, and at most one exists at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::engine::MealTimer;
use super::session::{CompletedSession, SessionSink};
use crate::clock::Clock;
use crate::events::{Event, Snapshot};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

struct Shared<S> {
    timer: MealTimer<S>,
    /// Bumped on every start so a stale ticker can never touch a new session.
    generation: u64,
    revision: u64,
}

impl<S: SessionSink> Shared<S> {
    fn publish(&mut self, tx: &watch::Sender<Snapshot>) {
        self.revision += 1;
        let mut snapshot = self.timer.snapshot();
        snapshot.revision = self.revision;
        tx.send_replace(snapshot);
    }
}

pub struct TimerController<S> {
    shared: Arc<Mutex<Shared<S>>>,
    clock: Arc<dyn Clock>,
    ticker: std::sync::Mutex<Option<JoinHandle<()>>>,
    tick_interval: Duration,
    snapshots: Arc<watch::Sender<Snapshot>>,
}

impl<S> TimerController<S>
where
    S: SessionSink + Send + 'static,
{
    pub fn new(sink: S, clock: Arc<dyn Clock>) -> Self {
        Self::with_tick_interval(sink, clock, DEFAULT_TICK_INTERVAL)
    }

    pub fn with_tick_interval(sink: S, clock: Arc<dyn Clock>, tick_interval: Duration) -> Self {
        let timer = MealTimer::new(sink);
        let (tx, _rx) = watch::channel(timer.snapshot());
        Self {
            shared: Arc::new(Mutex::new(Shared {
                timer,
                generation: 0,
                revision: 0,
            })),
            clock,
            ticker: std::sync::Mutex::new(None),
            tick_interval,
            snapshots: Arc::new(tx),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Begin recording and spawn the ticker. Returns false if already recording.
    pub async fn start(&self) -> bool {
        let mut shared = self.shared.lock().await;
        let Some(event) = shared.timer.start() else {
            return false;
        };
        shared.generation += 1;
        let generation = shared.generation;
        shared.publish(&self.snapshots);
        self.spawn_ticker(generation);
        tracing::info!(?event, "meal timer started");
        true
    }

    /// Stop recording and hand the session to the sink.
    ///
    /// The ticker is aborted while the timer lock is held, so no tick lands
    /// after this returns.
    pub async fn stop(&self) -> Option<CompletedSession> {
        let mut shared = self.shared.lock().await;
        let event = shared.timer.stop(self.clock.now());
        self.cancel_ticker();
        let Some(Event::RecordingStopped { session }) = event else {
            return None;
        };
        shared.publish(&self.snapshots);
        tracing::info!(duration_secs = session.duration_secs, "meal timer stopped");
        Some(session)
    }

    /// Start when idle, stop when recording.
    pub async fn toggle(&self) -> Option<CompletedSession> {
        let recording = self.shared.lock().await.timer.is_recording();
        if recording {
            self.stop().await
        } else {
            self.start().await;
            None
        }
    }

    /// Run `f` against the sink and publish a new snapshot afterwards.
    pub async fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut shared = self.shared.lock().await;
        let out = f(shared.timer.sink_mut());
        shared.publish(&self.snapshots);
        out
    }

    /// Run `f` against the sink without publishing. For queries only.
    pub async fn read_sink<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let shared = self.shared.lock().await;
        f(shared.timer.sink())
    }

    pub fn is_ticking(&self) -> bool {
        match self.ticker.lock() {
            Ok(guard) => guard.as_ref().is_some_and(|h| !h.is_finished()),
            Err(_) => false,
        }
    }

    fn spawn_ticker(&self, generation: u64) {
        let shared = Arc::clone(&self.shared);
        let snapshots = Arc::clone(&self.snapshots);
        let period = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut guard = shared.lock().await;
                if guard.generation != generation || guard.timer.tick().is_none() {
                    break;
                }
                guard.publish(&snapshots);
            }
        });

        self.replace_ticker(Some(handle));
    }

    fn cancel_ticker(&self) {
        self.replace_ticker(None);
    }

    fn replace_ticker(&self, next: Option<JoinHandle<()>>) {
        let mut guard = match self.ticker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(old) = guard.take() {
            old.abort();
        }
        *guard = next;
    }
}

impl<S> Drop for TimerController<S> {
    fn drop(&mut self) {
        let guard = match self.ticker.get_mut() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = guard.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::meal::{MealLog, MealType};
    use crate::timer::DailyTally;
    use chrono::DateTime;

    fn clock(rfc3339: &str) -> Arc<FixedClock> {
        Arc::new(FixedClock::new(DateTime::parse_from_rfc3339(rfc3339).unwrap()))
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second_while_recording() {
        let controller = TimerController::new(MealLog::new(), clock("2024-09-02T07:15:00+09:00"));
        assert!(controller.start().await);
        time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(controller.snapshot().elapsed_secs, 3);
        assert_eq!(controller.snapshot().elapsed_display, "00:03");

        let session = controller.stop().await.unwrap();
        assert_eq!(session.duration_secs, 3);

        time::sleep(Duration::from_secs(5)).await;
        let snap = controller.snapshot();
        assert!(!snap.recording());
        assert_eq!(snap.elapsed_secs, 0);
        assert!(!controller.is_ticking());

        let records = controller.read_sink(|log| log.records().to_vec()).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].meal_type, MealType::Breakfast);
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_keeps_a_single_ticker() {
        let controller = TimerController::new(MealLog::new(), clock("2024-09-02T12:00:00+09:00"));
        assert!(controller.start().await);
        assert!(!controller.start().await);
        time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(controller.snapshot().elapsed_secs, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_begins_from_zero() {
        let controller = TimerController::new(DailyTally::new(), clock("2024-09-02T12:00:00+09:00"));
        controller.start().await;
        time::sleep(Duration::from_millis(30_500)).await;
        controller.stop().await;
        controller.start().await;
        time::sleep(Duration::from_millis(45_500)).await;
        controller.stop().await;

        let tally = controller.read_sink(|t| t.clone()).await;
        assert_eq!(tally.total_secs, 75);
        assert_eq!(tally.meal_count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_controller_cancels_the_ticker() {
        let controller = TimerController::new(MealLog::new(), clock("2024-09-02T12:00:00+09:00"));
        let rx = controller.subscribe();
        controller.start().await;
        time::sleep(Duration::from_millis(1_500)).await;
        drop(controller);
        time::sleep(Duration::from_secs(3)).await;
        assert_eq!(rx.borrow().elapsed_secs, 1);
        assert!(rx.has_changed().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn sink_edits_publish_a_new_revision() {
        let controller = TimerController::new(MealLog::new(), clock("2024-09-02T19:00:00+09:00"));
        controller.toggle().await;
        controller.toggle().await;
        let before = controller.snapshot().revision;
        let changed = controller
            .with_sink(|log| {
                let id = log.records()[0].id.clone();
                log.set_meal_type(&id, MealType::Snack)
            })
            .await;
        assert!(changed);
        assert!(controller.snapshot().revision > before);
    }

    #[tokio::test(start_paused = true)]
    async fn reading_the_sink_does_not_publish() {
        let controller = TimerController::new(MealLog::new(), clock("2024-09-02T19:00:00+09:00"));
        controller.toggle().await;
        controller.toggle().await;
        let mut rx = controller.subscribe();
        let _ = rx.borrow_and_update();
        let before = controller.snapshot().revision;

        let count = controller.read_sink(|log| log.len()).await;
        assert_eq!(count, 1);
        assert_eq!(controller.snapshot().revision, before);
        assert!(!rx.has_changed().unwrap());
    }
}

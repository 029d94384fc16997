use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// One contiguous recording interval, produced on stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub start_time: DateTime<FixedOffset>,
    pub stop_time: DateTime<FixedOffset>,
    pub duration_secs: u64,
}

impl CompletedSession {
    /// Build a session that ended at `stop_time` after `duration_secs` ticks.
    pub fn ending_at(stop_time: DateTime<FixedOffset>, duration_secs: u64) -> Self {
        let secs = i64::try_from(duration_secs).unwrap_or(i64::MAX);
        let start_time = Duration::try_seconds(secs)
            .and_then(|d| stop_time.checked_sub_signed(d))
            .unwrap_or(stop_time);
        Self {
            start_time,
            stop_time,
            duration_secs,
        }
    }
}

/// Receives every completed session from a [`MealTimer`](super::MealTimer).
///
/// The sink decides what a session becomes: a full record, a running total,
/// or anything else a screen needs.
pub trait SessionSink {
    fn on_session(&mut self, session: &CompletedSession);
}

/// Home screen aggregate: today's total time and meal count, no detail.
///
/// Rolls over to zero when a session stops on a later local date than the
/// one being tallied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTally {
    pub day: Option<NaiveDate>,
    pub total_secs: u64,
    pub meal_count: u32,
}

impl DailyTally {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionSink for DailyTally {
    fn on_session(&mut self, session: &CompletedSession) {
        let day = session.stop_time.date_naive();
        if self.day.is_some_and(|current| day > current) {
            tracing::debug!(%day, "daily tally rolled over");
            self.total_secs = 0;
            self.meal_count = 0;
        }
        if self.day.map_or(true, |current| day > current) {
            self.day = Some(day);
        }
        self.total_secs = self.total_secs.saturating_add(session.duration_secs);
        self.meal_count = self.meal_count.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn start_is_stop_minus_duration() {
        let s = CompletedSession::ending_at(at("2024-09-02T07:15:00+09:00"), 125);
        assert_eq!(s.start_time, at("2024-09-02T07:12:55+09:00"));
        let zero = CompletedSession::ending_at(at("2024-09-02T07:15:00+09:00"), 0);
        assert_eq!(zero.start_time, zero.stop_time);
    }

    #[test]
    fn tally_sums_sessions() {
        let mut tally = DailyTally::new();
        tally.on_session(&CompletedSession::ending_at(at("2024-09-02T07:15:00+09:00"), 30));
        tally.on_session(&CompletedSession::ending_at(at("2024-09-02T12:15:00+09:00"), 45));
        assert_eq!(tally.total_secs, 75);
        assert_eq!(tally.meal_count, 2);
    }

    #[test]
    fn tally_rolls_over_on_a_new_day() {
        let mut tally = DailyTally::new();
        tally.on_session(&CompletedSession::ending_at(at("2024-09-02T20:00:00+09:00"), 600));
        tally.on_session(&CompletedSession::ending_at(at("2024-09-03T07:00:00+09:00"), 300));
        assert_eq!(tally.day, NaiveDate::from_ymd_opt(2024, 9, 3));
        assert_eq!(tally.total_secs, 300);
        assert_eq!(tally.meal_count, 1);
    }
}

//! Chart data for the Graph screen.
//!
//! Records belong to the local calendar day of their `start_time`.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::meal::{MealRecord, MealType};

/// Total meal time on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub total_secs: u64,
}

impl DayTotal {
    /// Axis label, `M/D`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.date.month(), self.date.day())
    }

    pub fn total_minutes(&self) -> u64 {
        self.total_secs / 60
    }
}

/// Time spent on one meal type within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealTypeTotal {
    pub meal_type: MealType,
    pub total_secs: u64,
}

/// Longest history range a chart may ask for.
pub const MAX_STATS_DAYS: u32 = 366;

/// Per-day totals for the `days` days ending at `end` (inclusive), oldest
/// first. Days without meals are reported as zero. `days` is capped at
/// [`MAX_STATS_DAYS`].
pub fn weekly_totals(records: &[MealRecord], end: NaiveDate, days: u32) -> Vec<DayTotal> {
    let days = days.min(MAX_STATS_DAYS);
    let mut totals: Vec<DayTotal> = (0..days)
        .rev()
        .filter_map(|back| end.checked_sub_signed(Duration::days(i64::from(back))))
        .map(|date| DayTotal {
            date,
            total_secs: 0,
        })
        .collect();

    for record in records {
        let day = record.start_time.date_naive();
        if let Some(slot) = totals.iter_mut().find(|t| t.date == day) {
            slot.total_secs = slot.total_secs.saturating_add(record.duration);
        }
    }
    totals
}

/// Per-meal-type totals on `date`, in [`MealType::ALL`] order, omitting
/// types with no records.
pub fn daily_breakdown(records: &[MealRecord], date: NaiveDate) -> Vec<MealTypeTotal> {
    MealType::ALL
        .into_iter()
        .filter_map(|meal_type| {
            let mut matched = records
                .iter()
                .filter(|r| r.meal_type == meal_type && r.start_time.date_naive() == date)
                .peekable();
            matched.peek()?;
            Some(MealTypeTotal {
                meal_type,
                total_secs: matched.map(|r| r.duration).sum(),
            })
        })
        .collect()
}

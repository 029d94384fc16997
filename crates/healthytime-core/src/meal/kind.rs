//! Meal types and time-of-day classification.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
    LateNight,
}

/// Language used for user-facing meal labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ja,
}

impl MealType {
    /// All meal types in selection-dialog order.
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Snack,
        MealType::Dinner,
        MealType::LateNight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Snack => "snack",
            MealType::Dinner => "dinner",
            MealType::LateNight => "late-night",
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        match language {
            Language::En => self.as_str(),
            Language::Ja => match self {
                MealType::Breakfast => "朝食",
                MealType::Lunch => "昼食",
                MealType::Snack => "間食",
                MealType::Dinner => "夕食",
                MealType::LateNight => "夜食",
            },
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = trimmed.to_ascii_lowercase().replace('_', "-");
        let found = MealType::ALL.into_iter().find(|meal| {
            meal.as_str() == normalized || meal.label(Language::Ja) == trimmed
        });
        match (found, normalized.as_str()) {
            (Some(meal), _) => Ok(meal),
            (None, "latenight") => Ok(MealType::LateNight),
            _ => Err(ValidationError::UnknownMealType(s.to_string())),
        }
    }
}

/// Map an hour of the day (0..24) to its meal type.
pub fn classify_hour(hour: u32) -> MealType {
    match hour {
        5..=9 => MealType::Breakfast,
        10..=14 => MealType::Lunch,
        15..=17 => MealType::Snack,
        18..=21 => MealType::Dinner,
        _ => MealType::LateNight,
    }
}

/// Classify a timestamp by the hour in its own (local) offset.
pub fn classify<Tz: TimeZone>(at: &DateTime<Tz>) -> MealType {
    classify_hour(at.hour())
}

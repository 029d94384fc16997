use chrono::{DateTime, NaiveTime, Timelike};
use healthytime_core::meal::{classify_hour, Language};
use healthytime_core::{classify, format_mm_ss, Config, MealType, ValidationError};

/// Accepts `HH:MM` (taken as local time) or a full RFC 3339 timestamp.
pub fn parse_meal_time(input: &str) -> Result<MealType, ValidationError> {
    let trimmed = input.trim();
    if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M") {
        return Ok(classify_hour(time.hour()));
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|at| classify(&at))
        .map_err(|_| ValidationError::InvalidTime(input.to_string()))
}

pub fn run_classify(time: &str) -> Result<(), Box<dyn std::error::Error>> {
    let meal = parse_meal_time(time)?;
    let language = Config::load_or_default().display.language;
    match language {
        Language::En => println!("{meal}"),
        Language::Ja => println!("{} ({meal})", meal.label(language)),
    }
    Ok(())
}

pub fn run_format(seconds: u64) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", format_mm_ss(seconds));
    Ok(())
}

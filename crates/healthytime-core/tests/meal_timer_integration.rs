//! End-to-end behaviour of the meal timer through the public API.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use healthytime_core::{
    classify, daily_breakdown, weekly_totals, DailyTally, FixedClock, MealLog, MealTimer,
    MealType, PickOutcome, TimerController,
};
use proptest::prelude::*;

fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

fn run_session(timer: &mut MealTimer<MealLog>, secs: u64, stop: DateTime<FixedOffset>) {
    timer.start();
    for _ in 0..secs {
        timer.tick();
    }
    timer.stop(stop);
}

#[test]
fn breakfast_at_quarter_past_seven() {
    let mut timer = MealTimer::new(MealLog::new());
    let stop = at("2024-09-02T07:15:00+09:00");
    run_session(&mut timer, 125, stop);

    let record = &timer.sink().records()[0];
    assert_eq!(record.meal_type, MealType::Breakfast);
    assert_eq!(record.duration, 125);
    assert_eq!(record.start_time, stop - chrono::Duration::seconds(125));
}

#[test]
fn ten_to_midnight_is_late_night() {
    assert_eq!(classify(&at("2024-09-02T23:50:00+09:00")), MealType::LateNight);
}

#[test]
fn a_day_of_meals_edited_and_summarised() {
    let mut timer = MealTimer::new(MealLog::new());
    run_session(&mut timer, 900, at("2024-09-02T07:40:00+09:00"));
    run_session(&mut timer, 1500, at("2024-09-02T12:45:00+09:00"));
    run_session(&mut timer, 300, at("2024-09-02T16:00:00+09:00"));
    run_session(&mut timer, 1800, at("2024-09-02T19:30:00+09:00"));

    let mut log = timer.into_sink();
    assert_eq!(log.len(), 4);

    // The snack was really part of lunch.
    let snack_id = log.records()[1].id.clone();
    assert!(log.set_meal_type(&snack_id, MealType::Lunch));

    let dinner_id = log.records()[0].id.clone();
    assert!(!log.attach_image(&dinner_id, PickOutcome::Cancelled));
    assert!(log.attach_image(&dinner_id, PickOutcome::Picked("content://photos/9".into())));

    let breakfast_id = log.records()[3].id.clone();
    assert!(log.request_delete(&breakfast_id));
    assert!(log.confirm_delete().is_some());

    let date = at("2024-09-02T00:00:00+09:00").date_naive();
    let breakdown = daily_breakdown(log.records(), date);
    let types: Vec<MealType> = breakdown.iter().map(|t| t.meal_type).collect();
    assert_eq!(types, vec![MealType::Lunch, MealType::Dinner]);
    assert_eq!(breakdown[0].total_secs, 1800);

    let week = weekly_totals(log.records(), date, 7);
    assert_eq!(week.last().unwrap().total_secs, 1500 + 300 + 1800);
}

#[tokio::test(start_paused = true)]
async fn home_and_record_screens_stay_independent() {
    let clock = Arc::new(FixedClock::new(at("2024-09-02T12:00:00+09:00")));
    let home = TimerController::new(DailyTally::new(), clock.clone());
    let record = TimerController::new(MealLog::new(), clock.clone());

    home.start().await;
    tokio::time::sleep(Duration::from_millis(30_500)).await;
    home.stop().await;
    home.start().await;
    tokio::time::sleep(Duration::from_millis(45_500)).await;
    home.stop().await;

    let tally = home.read_sink(|t| t.clone()).await;
    assert_eq!(tally.total_secs, 75);
    assert_eq!(tally.meal_count, 2);
    assert!(record.read_sink(|log| log.is_empty()).await);
}

#[derive(Debug, Clone)]
struct Seed {
    secs: u64,
    minute_of_day: u32,
}

fn seeds() -> impl Strategy<Value = Vec<Seed>> {
    proptest::collection::vec(
        (0u64..3600, 0u32..1440).prop_map(|(secs, minute_of_day)| Seed { secs, minute_of_day }),
        1..20,
    )
}

proptest! {
    #[test]
    fn delete_removes_exactly_one_and_keeps_order(seeds in seeds(), pick in any::<prop::sample::Index>()) {
        let mut timer = MealTimer::new(MealLog::new());
        for seed in &seeds {
            let stop = at("2024-09-02T00:00:00+09:00")
                + chrono::Duration::minutes(i64::from(seed.minute_of_day));
            run_session(&mut timer, seed.secs, stop);
        }
        let mut log = timer.into_sink();
        let before: Vec<String> = log.records().iter().map(|r| r.id.clone()).collect();
        let victim = before[pick.index(before.len())].clone();

        prop_assert!(log.request_delete(&victim));
        prop_assert!(log.confirm_delete().is_some());

        let after: Vec<String> = log.records().iter().map(|r| r.id.clone()).collect();
        let expected: Vec<String> = before.into_iter().filter(|id| *id != victim).collect();
        prop_assert_eq!(after, expected);
    }
}

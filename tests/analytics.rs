use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};
use chrono_tz::America::New_York;
use habit_analytics::calendar::build_month;
use habit_analytics::insights::{NO_RECENT_ACTIVITY, generate};
use habit_analytics::models::{HabitRecord, HabitSnapshot};
use habit_analytics::stats::aggregate;
use habit_analytics::streak::compute_streak;
use habit_analytics::{CompletionRateRule, Snapshot};
use std::collections::BTreeSet;

fn zone() -> FixedOffset {
    FixedOffset::west_opt(5 * 3600).unwrap()
}

/// 2026-03-18 21:30 at UTC-5, already the 19th in UTC.
fn now() -> DateTime<FixedOffset> {
    zone().with_ymd_and_hms(2026, 3, 18, 21, 30, 0).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 18).unwrap()
}

fn key(days_back: i64) -> String {
    (today() - Duration::days(days_back)).to_string()
}

#[test]
fn scenario_a_three_day_live_streak() {
    let habits = vec![HabitRecord::new(1, "Read").with_completions([key(2), key(1), key(0)])];
    let snapshot = Snapshot::capture(&habits, &now());
    assert_eq!(compute_streak(&snapshot.habits[0].days, snapshot.today), 3);
}

#[test]
fn scenario_b_missing_today_resets_to_zero() {
    let habits = vec![HabitRecord::new(1, "Read").with_completions([key(2), key(1)])];
    let snapshot = Snapshot::capture(&habits, &now());
    assert_eq!(compute_streak(&snapshot.habits[0].days, snapshot.today), 0);
}

#[test]
fn scenario_c_inactive_habits_do_not_dilute_the_rate() {
    let habits = vec![
        HabitRecord::new(1, "Read").with_completions([key(0)]),
        HabitRecord::new(2, "Walk").inactive(),
    ];
    let rollups = aggregate(&habits, &now(), CompletionRateRule::TodayActive);
    assert_eq!(rollups.completion_rate, 100);
}

#[test]
fn scenario_d_empty_collection() {
    let rollups = aggregate(&[], &now(), CompletionRateRule::TodayActive);
    assert_eq!(rollups.completion_rate, 0);
    assert_eq!(rollups.best_streak, 0);
    assert!(rollups.top_habits.is_empty());
    assert_eq!(generate(&rollups), vec![NO_RECENT_ACTIVITY.to_string()]);

    let grid = build_month(2026, 3, &[], &now()).unwrap();
    assert_eq!(grid.cells().count(), 42);
    assert!(grid.cells().all(|cell| cell.completion_count == 0));
}

#[test]
fn scenario_e_thirty_day_month_starting_wednesday() {
    // September 2027: 30 days, the 1st is a Wednesday.
    let grid = build_month(2027, 9, &[], &now()).unwrap();
    assert_eq!(grid.weeks.len(), 6);
    let leading = grid.weeks[0]
        .iter()
        .take_while(|cell| !cell.in_current_month)
        .count();
    assert_eq!(leading, 3);
    assert_eq!(grid.weeks[0][3].day_of_month, 1);
    assert_eq!(grid.cells().filter(|cell| cell.is_today).count(), 0);
}

#[test]
fn utc_instants_land_on_the_local_day() {
    // 02:00Z on the 19th is still the evening of the 18th at UTC-5.
    let habits = vec![HabitRecord::new(1, "Read").with_completions([
        "2026-03-19T02:00:00Z",
        "2026-03-17T12:00:00-05:00",
    ])];
    let rollups = aggregate(&habits, &now(), CompletionRateRule::TodayActive);
    assert_eq!(rollups.completion_rate, 100);
    assert_eq!(rollups.best_streak, 2);
}

#[test]
fn streak_runs_through_daylight_saving_changes() {
    // Late-evening check-ins stored as UTC instants, across both 2026 transitions.
    let spring = vec![HabitRecord::new(1, "Read").with_completions([
        "2026-03-07T04:30:00Z",
        "2026-03-08T04:30:00Z",
        "2026-03-09T03:30:00Z",
        "2026-03-10T03:30:00Z",
        "2026-03-11T00:00:00Z",
    ])];
    let now = New_York.with_ymd_and_hms(2026, 3, 10, 20, 0, 0).unwrap();
    let snapshot = Snapshot::capture(&spring, &now);
    let days: Vec<String> = snapshot.habits[0].days.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        days,
        ["2026-03-06", "2026-03-07", "2026-03-08", "2026-03-09", "2026-03-10"]
    );
    assert_eq!(snapshot.habits[0].streak_at(snapshot.today), 5);

    let autumn = vec![HabitRecord::new(1, "Read").with_completions([
        "2026-10-31T03:30:00Z",
        "2026-11-01T03:30:00Z",
        "2026-11-02T04:30:00Z",
        "2026-11-03T04:30:00Z",
    ])];
    let now = New_York.with_ymd_and_hms(2026, 11, 2, 23, 45, 0).unwrap();
    let rollups = aggregate(&autumn, &now, CompletionRateRule::TodayActive);
    assert_eq!(rollups.best_streak, 4);
    assert_eq!(rollups.completion_rate, 100);
}

#[test]
fn monthly_buckets_sum_to_the_month_total() {
    let habits = vec![
        HabitRecord::new(1, "Read").with_completions([
            "2026-03-01",
            "2026-03-09",
            "2026-03-18",
        ]),
        HabitRecord::new(2, "Walk").with_completions([
            "2026-03-31",
            "2026-03-31",
            "2026-02-28",
        ]),
    ];
    let rollups = aggregate(&habits, &now(), CompletionRateRule::TodayActive);
    let sum: u32 = rollups.monthly.iter().map(|bucket| bucket.count).sum();
    assert_eq!(sum, 5);
    assert_eq!(rollups.monthly[3].count, 2);
}

#[test]
fn streak_is_monotone_in_the_reference_day() {
    let base: BTreeSet<NaiveDate> = [3, 1, 2, 6]
        .iter()
        .map(|n| today() - Duration::days(*n))
        .collect();
    let mut with_today = base.clone();
    with_today.insert(today());
    assert_eq!(compute_streak(&base, today()), 0);
    assert_eq!(compute_streak(&with_today, today()), 4);
}

#[test]
fn snapshot_json_feeds_the_whole_pipeline() {
    let payload = format!(
        r#"{{"habits": [
            {{"_id": "a", "title": "Read", "completedDates": ["{}", "{}", 17, null]}},
            {{"_id": "b", "title": "Walk", "isActive": true, "completedDates": ["{}"]}}
        ]}}"#,
        key(0),
        key(1),
        key(1)
    );
    let snapshot = HabitSnapshot::from_json(payload.as_bytes()).unwrap();
    let rollups = aggregate(&snapshot.habits, &now(), CompletionRateRule::TodayActive);
    assert_eq!(rollups.completion_rate, 50);
    assert_eq!(rollups.top_habits[0].name, "Read");
    // The bare integer is a (very old) epoch-millis instant; null is skipped.
    assert_eq!(rollups.top_habits[0].total, 3);
    assert_eq!(rollups.top_habits[0].percent, 100);
    assert_eq!(rollups.top_habits[1].percent, 33);
}

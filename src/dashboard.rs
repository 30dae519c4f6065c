//! Per-screen views built on the same snapshot as the rollups: the dashboard
//! header, the habit list and a single habit's detail page.

use chrono::{Datelike, Duration};

use crate::dates;
use crate::models::{DashboardSummary, DayMark, HabitDetail, HabitListRow, HabitStats};
use crate::snapshot::{NormalizedHabit, Snapshot};
use crate::stats::{self, CompletionRateRule};

/// Sun-first short names, matching `Weekday::num_days_from_sunday`.
const SUNDAY_FIRST_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const DETAIL_STRIP_DAYS: i64 = 7;

pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=16 => "Good afternoon",
        17..=21 => "Good evening",
        _ => "Good night",
    }
}

pub fn habit_stats(snapshot: &Snapshot) -> HabitStats {
    let mut stats = HabitStats::default();
    for habit in &snapshot.habits {
        stats.total_habits += 1;
        if habit.is_active() {
            stats.active_habits += 1;
        }
        stats.total_check_ins += habit.total();
        stats.check_ins_today += habit
            .completions
            .iter()
            .filter(|day| **day == snapshot.today)
            .count() as u32;
    }
    stats
}

/// Rate and best streak come from the period rollups so the dashboard and the
/// stats screen never disagree.
pub fn summary(snapshot: &Snapshot, rule: CompletionRateRule) -> DashboardSummary {
    let rollups = stats::aggregate_at(snapshot, rule);
    let completed_today = snapshot
        .active()
        .filter(|habit| habit.completed_on(snapshot.today))
        .count() as u32;

    DashboardSummary {
        greeting: greeting(snapshot.hour).to_string(),
        today: dates::day_key(snapshot.today),
        total_habits: snapshot.habits.len() as u32,
        completed_today,
        best_streak: rollups.best_streak,
        completion_rate: rollups.completion_rate,
        stats: habit_stats(snapshot),
    }
}

pub fn habit_list(snapshot: &Snapshot) -> Vec<HabitListRow> {
    snapshot
        .habits
        .iter()
        .map(|habit| HabitListRow {
            id: habit.record.id.clone(),
            title: habit.record.title.clone(),
            is_active: habit.is_active(),
            streak: habit.streak_at(snapshot.today),
            completed_today: habit.completed_on(snapshot.today),
        })
        .collect()
}

pub fn habit_detail(habit: &NormalizedHabit, snapshot: &Snapshot) -> HabitDetail {
    let today = snapshot.today;
    let last_7_days = (0..DETAIL_STRIP_DAYS)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            DayMark {
                label: SUNDAY_FIRST_LABELS[day.weekday().num_days_from_sunday() as usize]
                    .to_string(),
                date_key: dates::day_key(day),
                completed: habit.completed_on(day),
            }
        })
        .collect();

    HabitDetail {
        id: habit.record.id.clone(),
        title: habit.record.title.clone(),
        is_active: habit.is_active(),
        done_today: habit.completed_on(today),
        total_completions: habit.total(),
        last_completed: habit.latest().map(dates::day_key),
        current_streak: habit.streak_at(today),
        last_7_days,
    }
}

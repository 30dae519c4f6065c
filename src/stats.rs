use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use std::str::FromStr;
use tracing::debug;

use crate::dates::{self, WEEKDAY_LABELS};
use crate::errors::AnalyticsError;
use crate::models::{HabitRecord, PeriodRollups, RollupBucket, TopHabit};
use crate::snapshot::Snapshot;
use crate::streak::streak_label;

pub const MONTH_BUCKET_LABELS: [&str; 4] = ["Week 1", "Week 2", "Week 3", "Week 4"];
pub const TOP_HABIT_LIMIT: usize = 4;
pub const TRAILING_WINDOW_DAYS: u32 = 30;

/// How `completion_rate` is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionRateRule {
    /// Share of active habits completed on the reference day.
    #[default]
    TodayActive,
    /// Completions in the trailing 30 days over `active habits * 30`.
    ThirtyDay,
}

impl FromStr for CompletionRateRule {
    type Err = AnalyticsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" | "today-active" => Ok(Self::TodayActive),
            "thirty-day" | "30-day" => Ok(Self::ThirtyDay),
            other => Err(AnalyticsError::Config(format!(
                "unknown completion rate rule `{other}` (expected `today` or `thirty-day`)"
            ))),
        }
    }
}

pub fn aggregate<Tz: TimeZone>(
    habits: &[HabitRecord],
    now: &DateTime<Tz>,
    rule: CompletionRateRule,
) -> PeriodRollups {
    aggregate_at(&Snapshot::capture(habits, now), rule)
}

pub fn aggregate_at(snapshot: &Snapshot, rule: CompletionRateRule) -> PeriodRollups {
    let today = snapshot.today;
    let week_start = dates::week_start(today);
    let week_end = week_start + Duration::days(6);
    let window_start = dates::window_start(today, TRAILING_WINDOW_DAYS);

    let mut weekly = [0u32; 7];
    let mut monthly = [0u32; 4];
    let mut completions_last_30_days = 0u32;
    let mut completed_today = 0u32;
    let mut best_streak = 0u32;
    let mut active_habits = 0u32;
    let mut ranking = Vec::new();

    for habit in snapshot.active() {
        active_habits += 1;
        let streak = habit.streak_at(today);
        best_streak = best_streak.max(streak);
        if habit.completed_on(today) {
            completed_today += 1;
        }
        ranking.push((habit.record.title.as_str(), streak, habit.total()));

        for &day in &habit.completions {
            if (window_start..=today).contains(&day) {
                completions_last_30_days += 1;
            }
            if (week_start..=week_end).contains(&day) {
                weekly[dates::weekday_index(day)] += 1;
            }
            if dates::same_month(day, today) {
                monthly[month_bucket(day)] += 1;
            }
        }
    }

    let completion_rate = match rule {
        CompletionRateRule::TodayActive => percent(completed_today, active_habits),
        CompletionRateRule::ThirtyDay => {
            percent(completions_last_30_days, active_habits * TRAILING_WINDOW_DAYS).min(100)
        }
    };

    // Stable: equal totals keep input order.
    ranking.sort_by(|a, b| b.2.cmp(&a.2));
    let top_total = ranking.first().map(|entry| entry.2).unwrap_or(0);
    let top_habits = ranking
        .into_iter()
        .take(TOP_HABIT_LIMIT)
        .map(|(name, streak, total)| TopHabit {
            name: name.to_string(),
            streak,
            total,
            streak_label: streak_label(streak),
            total_label: format!("{total} total completions"),
            percent: percent(total, top_total),
        })
        .collect();

    debug!(
        active_habits,
        completed_today,
        best_streak,
        completions_last_30_days,
        "aggregated period rollups"
    );

    PeriodRollups {
        reference_date: dates::day_key(today),
        active_habits,
        weekly: buckets(&WEEKDAY_LABELS, &weekly),
        monthly: buckets(&MONTH_BUCKET_LABELS, &monthly),
        completion_rate,
        best_streak,
        completions_last_30_days,
        top_habits,
    }
}

/// Days 1-7 -> 0, 8-14 -> 1, 15-21 -> 2, 22 onwards -> 3.
fn month_bucket(day: NaiveDate) -> usize {
    (((day.day() - 1) / 7) as usize).min(MONTH_BUCKET_LABELS.len() - 1)
}

fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}

fn buckets(labels: &[&str], counts: &[u32]) -> Vec<RollupBucket> {
    labels
        .iter()
        .zip(counts)
        .map(|(label, count)| RollupBucket {
            label: label.to_string(),
            count: *count,
        })
        .collect()
}

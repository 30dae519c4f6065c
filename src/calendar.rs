use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use std::collections::HashMap;
use tracing::debug;

use crate::dates;
use crate::errors::AnalyticsError;
use crate::models::{CalendarCell, CompletedHabit, HabitRecord, MonthGrid, MonthSummary};
use crate::snapshot::{NormalizedHabit, Snapshot};

pub const GRID_WEEKS: usize = 6;
pub const DAYS_PER_WEEK: usize = 7;

/// A displayed month, moved backwards and forwards by the calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn previous(self) -> Self {
        if self.month <= 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

pub fn build_month<Tz: TimeZone>(
    year: i32,
    month: u32,
    habits: &[HabitRecord],
    now: &DateTime<Tz>,
) -> Result<MonthGrid, AnalyticsError> {
    let snapshot = Snapshot::capture(habits, now);
    build_month_at(MonthCursor { year, month }, &snapshot)
}

/// Six Sunday-first weeks covering `cursor`'s month, whatever its length.
pub fn build_month_at(
    cursor: MonthCursor,
    snapshot: &Snapshot,
) -> Result<MonthGrid, AnalyticsError> {
    let first = dates::first_of_month(cursor.year, cursor.month)?;
    let completion_map = completions_by_day(&snapshot.habits);

    let mut day = dates::sunday_on_or_before(first);
    let mut weeks = Vec::with_capacity(GRID_WEEKS);
    for _ in 0..GRID_WEEKS {
        let mut cells = Vec::with_capacity(DAYS_PER_WEEK);
        for _ in 0..DAYS_PER_WEEK {
            let completed_habits = completion_map.get(&day).cloned().unwrap_or_default();
            cells.push(CalendarCell {
                date: day,
                date_key: dates::day_key(day),
                day_of_month: day.day(),
                in_current_month: dates::same_month(day, first),
                is_today: day == snapshot.today,
                completion_count: completed_habits.len() as u32,
                completed_habits,
            });
            day = day.succ_opt().ok_or(AnalyticsError::InvalidMonth {
                year: cursor.year,
                month: cursor.month,
            })?;
        }
        weeks.push(cells);
    }

    let summary = summarize(weeks.iter().flatten());
    debug!(
        year = cursor.year,
        month = cursor.month,
        total = summary.total_completions,
        "built month grid"
    );

    Ok(MonthGrid {
        year: cursor.year,
        month: cursor.month,
        month_label: dates::month_label(first),
        weeks,
        summary,
    })
}

/// Day -> habits completed that day, each habit at most once, in input order.
fn completions_by_day(habits: &[NormalizedHabit]) -> HashMap<NaiveDate, Vec<CompletedHabit>> {
    let mut map: HashMap<NaiveDate, Vec<CompletedHabit>> = HashMap::new();
    for habit in habits {
        for day in &habit.days {
            map.entry(*day).or_default().push(CompletedHabit {
                id: habit.record.id.clone(),
                title: habit.record.title.clone(),
            });
        }
    }
    map
}

fn summarize<'a>(cells: impl Iterator<Item = &'a CalendarCell>) -> MonthSummary {
    let mut summary = MonthSummary::default();
    for cell in cells.filter(|cell| cell.in_current_month) {
        summary.total_completions += cell.completion_count;
        if cell.completion_count > 0 {
            summary.active_days += 1;
        }
        summary.best_day_count = summary.best_day_count.max(cell.completion_count);
    }
    summary.has_any_completion = summary.active_days > 0;
    summary
}

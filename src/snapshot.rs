//! One-pass normalization of habit records against a reference instant.
//!
//! Every aggregation works on a [`Snapshot`]: the records with their
//! completions reduced to local calendar days, plus the reference day and hour.
//! Nothing here is cached between calls.

use chrono::{DateTime, NaiveDate, TimeZone, Timelike};
use std::collections::BTreeSet;
use tracing::debug;

use crate::dates;
use crate::models::HabitRecord;
use crate::streak::compute_streak;

#[derive(Debug, Clone)]
pub struct NormalizedHabit<'a> {
    pub record: &'a HabitRecord,
    /// One entry per parseable raw timestamp, duplicates kept, in input order.
    pub completions: Vec<NaiveDate>,
    pub days: BTreeSet<NaiveDate>,
    pub rejected: usize,
}

impl<'a> NormalizedHabit<'a> {
    pub fn from_record<Tz: TimeZone>(record: &'a HabitRecord, zone: &Tz) -> Self {
        let mut completions = Vec::with_capacity(record.completed_dates.len());
        let mut rejected = 0;
        for raw in &record.completed_dates {
            match dates::normalize(raw, zone) {
                Ok(day) => completions.push(day),
                Err(err) => {
                    rejected += 1;
                    debug!(habit = %record.id, %err, "skipping completion");
                }
            }
        }
        let days = completions.iter().copied().collect();
        Self {
            record,
            completions,
            days,
            rejected,
        }
    }

    pub fn is_active(&self) -> bool {
        self.record.is_active
    }

    pub fn total(&self) -> u32 {
        self.completions.len() as u32
    }

    pub fn completed_on(&self, day: NaiveDate) -> bool {
        self.days.contains(&day)
    }

    pub fn streak_at(&self, reference: NaiveDate) -> u32 {
        compute_streak(&self.days, reference)
    }

    pub fn latest(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }
}

#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub habits: Vec<NormalizedHabit<'a>>,
    pub today: NaiveDate,
    pub hour: u32,
}

impl<'a> Snapshot<'a> {
    /// Normalizes `records` in the zone carried by `now`, which also fixes
    /// "today" for every computation built from this snapshot.
    pub fn capture<Tz: TimeZone>(records: &'a [HabitRecord], now: &DateTime<Tz>) -> Self {
        let zone = now.timezone();
        let habits: Vec<_> = records
            .iter()
            .map(|record| NormalizedHabit::from_record(record, &zone))
            .collect();
        let rejected: usize = habits.iter().map(|habit| habit.rejected).sum();
        let today = now.date_naive();
        debug!(
            habits = habits.len(),
            rejected,
            today = %dates::day_key(today),
            "captured habit snapshot"
        );
        Self {
            habits,
            today,
            hour: now.hour(),
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &NormalizedHabit<'a>> {
        self.habits.iter().filter(|habit| habit.is_active())
    }

    pub fn find(&self, id: &str) -> Option<&NormalizedHabit<'a>> {
        self.habits
            .iter()
            .find(|habit| habit.record.id.to_string() == id)
    }
}

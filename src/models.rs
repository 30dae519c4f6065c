use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::errors::AnalyticsError;

/// Habit identifier as handed over by the data-fetch side: numeric ids and
/// document ids (`"64f0c..."`) both occur.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HabitId {
    Number(i64),
    Text(String),
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// One raw completion entry. Anything that is neither a string nor an
/// integer is kept as `Other` so it can be skipped without failing the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    Millis(i64),
    Other(serde_json::Value),
}

impl From<&str> for RawTimestamp {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawTimestamp {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Millis(millis) => write!(f, "{millis}"),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    #[serde(alias = "_id")]
    pub id: HabitId,
    pub title: String,
    #[serde(default = "default_active", deserialize_with = "active_unless_false")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "empty_when_null")]
    pub completed_dates: Vec<RawTimestamp>,
}

fn default_active() -> bool {
    true
}

/// Only an explicit `false` retires a habit; `null` reads as active.
fn active_unless_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)? != Some(false))
}

fn empty_when_null<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<RawTimestamp>, D::Error> {
    Ok(Option::<Vec<RawTimestamp>>::deserialize(deserializer)?.unwrap_or_default())
}

impl HabitRecord {
    pub fn new(id: impl Into<HabitId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_active: true,
            completed_dates: Vec::new(),
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn with_completions<I, T>(mut self, completions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RawTimestamp>,
    {
        self.completed_dates
            .extend(completions.into_iter().map(Into::into));
        self
    }
}

impl From<i64> for HabitId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for HabitId {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<&str> for HabitId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// The whole set of habit records for one user, as last fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitSnapshot {
    pub habits: Vec<HabitRecord>,
}

impl HabitSnapshot {
    pub fn new(habits: Vec<HabitRecord>) -> Self {
        Self { habits }
    }

    /// Accepts either a bare array of habit records or `{ "habits": [...] }`.
    /// An object without a `habits` array (absent or `null`) is an empty snapshot.
    pub fn from_json(payload: &[u8]) -> Result<Self, AnalyticsError> {
        let value: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|err| AnalyticsError::InvalidInput(format!("malformed JSON: {err}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, AnalyticsError> {
        let habits = match value {
            serde_json::Value::Array(_) => value,
            serde_json::Value::Object(mut map) => match map.remove("habits") {
                Some(habits @ serde_json::Value::Array(_)) => habits,
                None | Some(serde_json::Value::Null) => return Ok(Self::default()),
                Some(other) => {
                    return Err(AnalyticsError::InvalidInput(format!(
                        "expected a `habits` array, got {}",
                        json_kind(&other)
                    )));
                }
            },
            other => {
                return Err(AnalyticsError::InvalidInput(format!(
                    "expected a collection of habit records, got {}",
                    json_kind(&other)
                )));
            }
        };

        let habits = serde_json::from_value(habits)
            .map_err(|err| AnalyticsError::InvalidInput(format!("invalid habit record: {err}")))?;
        Ok(Self { habits })
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedHabit {
    pub id: HabitId,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    #[serde(skip)]
    pub date: NaiveDate,
    pub date_key: String,
    pub day_of_month: u32,
    pub in_current_month: bool,
    pub is_today: bool,
    pub completed_habits: Vec<CompletedHabit>,
    pub completion_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub total_completions: u32,
    pub active_days: u32,
    pub best_day_count: u32,
    pub has_any_completion: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub month_label: String,
    pub weeks: Vec<Vec<CalendarCell>>,
    pub summary: MonthSummary,
}

impl MonthGrid {
    pub fn cells(&self) -> impl Iterator<Item = &CalendarCell> {
        self.weeks.iter().flatten()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RollupBucket {
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TopHabit {
    pub name: String,
    pub streak: u32,
    pub total: u32,
    pub streak_label: String,
    pub total_label: String,
    pub percent: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRollups {
    pub reference_date: String,
    pub active_habits: u32,
    pub weekly: Vec<RollupBucket>,
    pub monthly: Vec<RollupBucket>,
    pub completion_rate: u32,
    pub best_streak: u32,
    pub completions_last_30_days: u32,
    pub top_habits: Vec<TopHabit>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    #[serde(flatten)]
    pub rollups: PeriodRollups,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    pub total_habits: u32,
    pub active_habits: u32,
    pub total_check_ins: u32,
    pub check_ins_today: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub greeting: String,
    pub today: String,
    pub total_habits: u32,
    pub completed_today: u32,
    pub best_streak: u32,
    pub completion_rate: u32,
    pub stats: HabitStats,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HabitListRow {
    pub id: HabitId,
    pub title: String,
    pub is_active: bool,
    pub streak: u32,
    pub completed_today: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayMark {
    pub label: String,
    pub date_key: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HabitDetail {
    pub id: HabitId,
    pub title: String,
    pub is_active: bool,
    pub done_today: bool,
    pub total_completions: u32,
    pub last_completed: Option<String>,
    pub current_streak: u32,
    pub last_7_days: Vec<DayMark>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub stats: StatsReport,
    pub calendar: MonthGrid,
    pub dashboard: DashboardSummary,
    pub habits: Vec<HabitListRow>,
}

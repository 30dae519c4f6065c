use crate::calendar::{self, MonthCursor};
use crate::dashboard;
use crate::errors::AppError;
use crate::models::{
    AnalysisReport, DashboardSummary, HabitDetail, HabitListRow, HabitSnapshot, MonthGrid,
    StatsReport,
};
use crate::report;
use crate::snapshot::Snapshot;
use crate::state::AppState;
use crate::storage::persist_snapshot;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl CalendarQuery {
    fn cursor(&self, snapshot: &Snapshot) -> MonthCursor {
        let current = MonthCursor::containing(snapshot.today);
        MonthCursor {
            year: self.year.unwrap_or(current.year),
            month: self.month.unwrap_or(current.month),
        }
    }
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsReport>, AppError> {
    let data = state.snapshot.lock().await;
    let snapshot = state.config.zone.capture(&data.habits);
    Ok(Json(report::stats_report(&snapshot, state.config.completion_rate)))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<MonthGrid>, AppError> {
    let data = state.snapshot.lock().await;
    let snapshot = state.config.zone.capture(&data.habits);
    let grid = calendar::build_month_at(query.cursor(&snapshot), &snapshot)?;
    Ok(Json(grid))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let data = state.snapshot.lock().await;
    let snapshot = state.config.zone.capture(&data.habits);
    Ok(Json(dashboard::summary(&snapshot, state.config.completion_rate)))
}

pub async fn list_habits(
    State(state): State<AppState>,
) -> Result<Json<Vec<HabitListRow>>, AppError> {
    let data = state.snapshot.lock().await;
    let snapshot = state.config.zone.capture(&data.habits);
    Ok(Json(dashboard::habit_list(&snapshot)))
}

pub async fn get_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HabitDetail>, AppError> {
    let data = state.snapshot.lock().await;
    let snapshot = state.config.zone.capture(&data.habits);
    let habit = snapshot
        .find(&id)
        .ok_or_else(|| AppError::not_found(format!("no habit with id `{id}`")))?;
    Ok(Json(dashboard::habit_detail(habit, &snapshot)))
}

/// Replaces the stored snapshot with a freshly fetched one.
pub async fn replace_snapshot(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatsReport>, AppError> {
    let incoming = HabitSnapshot::from_json(&body)?;
    let mut data = state.snapshot.lock().await;
    persist_snapshot(&state.config.data_path, &incoming).await?;
    *data = incoming;
    info!(habits = data.habits.len(), "replaced habit snapshot");

    let snapshot = state.config.zone.capture(&data.habits);
    Ok(Json(report::stats_report(&snapshot, state.config.completion_rate)))
}

/// Runs every view over a posted snapshot without touching stored state.
pub async fn analyze(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
    body: Bytes,
) -> Result<Json<AnalysisReport>, AppError> {
    let incoming = HabitSnapshot::from_json(&body)?;
    let snapshot = state.config.zone.capture(&incoming.habits);
    let cursor = query.cursor(&snapshot);
    let analysis = report::analyze(&snapshot, state.config.completion_rate, Some(cursor))?;
    Ok(Json(analysis))
}

use crate::calendar::{self, MonthCursor};
use crate::dashboard;
use crate::errors::AnalyticsError;
use crate::insights;
use crate::models::{AnalysisReport, StatsReport};
use crate::snapshot::Snapshot;
use crate::stats::{self, CompletionRateRule};

pub fn stats_report(snapshot: &Snapshot, rule: CompletionRateRule) -> StatsReport {
    let rollups = stats::aggregate_at(snapshot, rule);
    let insights = insights::generate(&rollups);
    StatsReport { rollups, insights }
}

/// Every view for one snapshot; the calendar defaults to the reference month.
pub fn analyze(
    snapshot: &Snapshot,
    rule: CompletionRateRule,
    month: Option<MonthCursor>,
) -> Result<AnalysisReport, AnalyticsError> {
    let cursor = month.unwrap_or_else(|| MonthCursor::containing(snapshot.today));
    Ok(AnalysisReport {
        stats: stats_report(snapshot, rule),
        calendar: calendar::build_month_at(cursor, snapshot)?,
        dashboard: dashboard::summary(snapshot, rule),
        habits: dashboard::habit_list(snapshot),
    })
}

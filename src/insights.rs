use crate::dates::WEEKDAY_LABELS;
use crate::models::PeriodRollups;

pub const NO_RECENT_ACTIVITY: &str = "No check-ins yet in the last 30 days.";

/// Observations drawn from `rollups`, in a fixed rule order.
///
/// With no completions in the trailing 30 days the list is exactly
/// [`NO_RECENT_ACTIVITY`]; otherwise each later rule contributes at most one
/// line when its precondition holds.
pub fn generate(rollups: &PeriodRollups) -> Vec<String> {
    if rollups.completions_last_30_days == 0 {
        return vec![NO_RECENT_ACTIVITY.to_string()];
    }

    let mut insights = Vec::new();

    if let Some(weekday) = most_consistent_weekday(rollups) {
        insights.push(format!("You are most consistent on {weekday}."));
    }

    // Ranking is stable, so the first entry already wins ties by input order.
    if let Some(best) = rollups.top_habits.first().filter(|habit| habit.total > 0) {
        insights.push(format!(
            "\"{}\" is your most completed habit with {} check-ins.",
            best.name, best.total
        ));
    }

    if rollups.best_streak > 0 {
        insights.push(format!(
            "Your longest streak so far is {} days. Keep it going!",
            rollups.best_streak
        ));
    }

    insights
}

fn most_consistent_weekday(rollups: &PeriodRollups) -> Option<&'static str> {
    let mut best: Option<(usize, u32)> = None;
    for (index, bucket) in rollups.weekly.iter().enumerate() {
        if bucket.count > best.map_or(0, |(_, count)| count) {
            best = Some((index, bucket.count));
        }
    }
    best.and_then(|(index, _)| WEEKDAY_LABELS.get(index).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HabitRecord;
    use crate::stats::{CompletionRateRule, aggregate};
    use chrono::{DateTime, TimeZone, Utc};

    // Thursday
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 27, 9, 0, 0).unwrap()
    }

    fn insights_for(habits: &[HabitRecord]) -> Vec<String> {
        generate(&aggregate(habits, &now(), CompletionRateRule::TodayActive))
    }

    #[test]
    fn empty_collection_reports_no_recent_activity_only() {
        assert_eq!(insights_for(&[]), vec![NO_RECENT_ACTIVITY.to_string()]);
    }

    #[test]
    fn stale_history_stops_after_the_first_rule() {
        let habits =
            vec![HabitRecord::new(1, "Read").with_completions(["2025-09-01", "2025-09-02"])];
        assert_eq!(insights_for(&habits), vec![NO_RECENT_ACTIVITY.to_string()]);
    }

    #[test]
    fn full_rule_set_in_order() {
        let habits = vec![
            HabitRecord::new(1, "Read").with_completions([
                "2025-11-25",
                "2025-11-26",
                "2025-11-27",
            ]),
            HabitRecord::new(2, "Walk").with_completions(["2025-11-25", "2025-11-10"]),
        ];
        assert_eq!(
            insights_for(&habits),
            vec![
                "You are most consistent on Tue.".to_string(),
                "\"Read\" is your most completed habit with 3 check-ins.".to_string(),
                "Your longest streak so far is 3 days. Keep it going!".to_string(),
            ]
        );
    }

    #[test]
    fn weekday_ties_go_to_the_earliest_day() {
        let habits =
            vec![HabitRecord::new(1, "Read").with_completions(["2025-11-26", "2025-11-24"])];
        let insights = insights_for(&habits);
        assert_eq!(insights[0], "You are most consistent on Mon.");
    }

    #[test]
    fn quiet_week_and_broken_streak_skip_their_rules() {
        // Completions only earlier in the month: no weekly bucket, no live streak.
        let habits = vec![
            HabitRecord::new(1, "Read").with_completions(["2025-11-10"]),
            HabitRecord::new(2, "Walk").with_completions(["2025-11-11", "2025-11-12"]),
        ];
        assert_eq!(
            insights_for(&habits),
            vec!["\"Walk\" is your most completed habit with 2 check-ins.".to_string()]
        );
    }
}

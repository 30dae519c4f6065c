use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Consecutive calendar days, ending at `reference`, present in `days`.
///
/// Only a streak that is still live counts: when `reference` itself is absent
/// the result is 0, whatever run of earlier days precedes it.
pub fn compute_streak(days: &BTreeSet<NaiveDate>, reference: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = Some(reference);
    while let Some(day) = cursor {
        if !days.contains(&day) {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

pub fn streak_label(streak: u32) -> String {
    format!("{streak}-day streak")
}

use chrono::{FixedOffset, Local, Utc};
use chrono_tz::Tz;
use std::{env, path::PathBuf, str::FromStr};

use crate::errors::AnalyticsError;
use crate::models::HabitRecord;
use crate::snapshot::Snapshot;
use crate::stats::CompletionRateRule;

const DEFAULT_DATA_PATH: &str = "data/habits.json";
const DEFAULT_PORT: u16 = 8080;

/// The time zone every calendar-day computation is evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoneSetting {
    #[default]
    Local,
    Named(Tz),
    Fixed(FixedOffset),
}

impl ZoneSetting {
    /// Normalizes `records` against the current instant in this zone. This is
    /// the only place the wall clock is read.
    pub fn capture<'a>(&self, records: &'a [HabitRecord]) -> Snapshot<'a> {
        match self {
            Self::Local => Snapshot::capture(records, &Local::now()),
            Self::Named(tz) => Snapshot::capture(records, &Utc::now().with_timezone(tz)),
            Self::Fixed(offset) => Snapshot::capture(records, &Utc::now().with_timezone(offset)),
        }
    }
}

impl FromStr for ZoneSetting {
    type Err = AnalyticsError;

    /// `local`, an IANA name (`UTC`, `Europe/Berlin`) or an offset (`+05:30`, `-0800`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        if let Ok(offset) = trimmed.parse::<FixedOffset>() {
            return Ok(Self::Fixed(offset));
        }
        trimmed
            .parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| AnalyticsError::Config(format!("unsupported time zone `{trimmed}`")))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub port: u16,
    pub zone: ZoneSetting,
    pub completion_rate: CompletionRateRule,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            port: DEFAULT_PORT,
            zone: ZoneSetting::default(),
            completion_rate: CompletionRateRule::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AnalyticsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AnalyticsError> {
        let mut config = Self::default();
        if let Some(path) = lookup("APP_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }
        if let Some(port) = lookup("PORT").and_then(|value| value.parse::<u16>().ok()) {
            config.port = port;
        }
        if let Some(zone) = lookup("APP_TIMEZONE") {
            config.zone = zone.parse()?;
        }
        if let Some(rule) = lookup("APP_COMPLETION_RATE") {
            config.completion_rate = rule.parse()?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/habits.json"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.zone, ZoneSetting::Local);
        assert_eq!(config.completion_rate, CompletionRateRule::TodayActive);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("APP_DATA_PATH", "/tmp/habits.json"),
            ("PORT", "9090"),
            ("APP_TIMEZONE", "+05:30"),
            ("APP_COMPLETION_RATE", "thirty-day"),
        ]))
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/habits.json"));
        assert_eq!(config.port, 9090);
        assert_eq!(
            config.zone,
            ZoneSetting::Fixed(FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap())
        );
        assert_eq!(config.completion_rate, CompletionRateRule::ThirtyDay);
    }

    #[test]
    fn unparsable_port_falls_back_but_bad_zone_is_an_error() {
        let config = AppConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap();
        assert_eq!(config.port, 8080);

        let err =
            AppConfig::from_lookup(lookup(&[("APP_TIMEZONE", "Mars/Olympus")])).unwrap_err();
        assert!(matches!(err, AnalyticsError::Config(_)));
    }

    #[test]
    fn offsets_and_named_zones() {
        assert_eq!(
            "-0800".parse::<ZoneSetting>().unwrap(),
            ZoneSetting::Fixed(FixedOffset::west_opt(8 * 3600).unwrap())
        );
        assert_eq!(
            "Europe/Berlin".parse::<ZoneSetting>().unwrap(),
            ZoneSetting::Named(chrono_tz::Europe::Berlin)
        );
        assert_eq!(
            " America/New_York ".parse::<ZoneSetting>().unwrap(),
            ZoneSetting::Named(chrono_tz::America::New_York)
        );
        assert_eq!(
            "UTC".parse::<ZoneSetting>().unwrap(),
            ZoneSetting::Named(chrono_tz::UTC)
        );
        assert_eq!("LOCAL".parse::<ZoneSetting>().unwrap(), ZoneSetting::Local);
        for bad in ["+05:75", "0530", "+ab:cd", "Mars/Olympus", ""] {
            assert!(bad.parse::<ZoneSetting>().is_err(), "{bad}");
        }
    }

    #[test]
    fn named_zone_capture_uses_the_zone_calendar() {
        let habits = vec![HabitRecord::new(1, "Read")];
        let zone = ZoneSetting::Named(chrono_tz::Pacific::Kiritimati);
        let snapshot = zone.capture(&habits);
        let expected = Utc::now()
            .with_timezone(&chrono_tz::Pacific::Kiritimati)
            .date_naive();
        // Tolerates a capture straddling midnight in that zone.
        assert!(snapshot.today == expected || snapshot.today.succ_opt() == Some(expected));
        assert_eq!(snapshot.habits.len(), 1);
    }
}

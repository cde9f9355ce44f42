use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

pub const MIN_REMINDER_COUNT: u32 = 1;
pub const MAX_REMINDER_COUNT: u32 = 10;
pub const DEFAULT_REMINDER_COUNT: u32 = 3;

pub fn default_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).expect("08:00 is a valid time of day")
}

pub fn default_end_time() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 0, 0).expect("22:00 is a valid time of day")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub count: u32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            count: DEFAULT_REMINDER_COUNT,
            start_time: default_start_time(),
            end_time: default_end_time(),
        }
    }
}

impl ReminderSettings {
    // Never fails: malformed fields are replaced by their defaults one by
    // one, and the count is clamped into range.
    pub fn from_stored(stored: &StoredReminderSettings) -> Self {
        let defaults = Self::default();

        Self {
            enabled: stored.enabled.unwrap_or(defaults.enabled),
            count: clamp_count(stored.count),
            start_time: parse_time("start_time", stored.start_time.as_deref(), defaults.start_time),
            end_time: parse_time("end_time", stored.end_time.as_deref(), defaults.end_time),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReminderSettings {
    pub enabled: Option<bool>,
    pub count: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl From<&ReminderSettings> for StoredReminderSettings {
    fn from(settings: &ReminderSettings) -> Self {
        Self {
            enabled: Some(settings.enabled),
            count: Some(i64::from(settings.count)),
            start_time: Some(settings.start_time.format("%H:%M").to_string()),
            end_time: Some(settings.end_time.format("%H:%M").to_string()),
        }
    }
}

fn clamp_count(raw: Option<i64>) -> u32 {
    match raw {
        Some(count) => count.clamp(i64::from(MIN_REMINDER_COUNT), i64::from(MAX_REMINDER_COUNT))
            as u32,
        None => DEFAULT_REMINDER_COUNT,
    }
}

fn parse_time(field: &str, raw: Option<&str>, default: NaiveTime) -> NaiveTime {
    let Some(raw) = raw else {
        return default;
    };

    match NaiveTime::parse_from_str(raw, "%H:%M") {
        Ok(time) => time,
        Err(error) => {
            log::warn!(
                "[SETTINGS] Could not parse {field} {raw:?}, using {} instead. {error}",
                default.format("%H:%M")
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(
        count: Option<i64>,
        start_time: Option<&str>,
        end_time: Option<&str>,
    ) -> StoredReminderSettings {
        StoredReminderSettings {
            enabled: Some(true),
            count,
            start_time: start_time.map(str::to_owned),
            end_time: end_time.map(str::to_owned),
        }
    }

    #[test]
    fn absent_store_yields_full_defaults() {
        let settings = ReminderSettings::from_stored(&StoredReminderSettings::default());

        assert_eq!(settings, ReminderSettings::default());
        assert!(settings.enabled);
        assert_eq!(settings.count, 3);
        assert_eq!(settings.start_time, default_start_time());
        assert_eq!(settings.end_time, default_end_time());
    }

    #[test]
    fn valid_fields_are_taken_as_is() {
        let settings =
            ReminderSettings::from_stored(&stored(Some(5), Some("06:30"), Some("23:15")));

        assert_eq!(settings.count, 5);
        assert_eq!(settings.start_time, NaiveTime::from_hms_opt(6, 30, 0).unwrap());
        assert_eq!(settings.end_time, NaiveTime::from_hms_opt(23, 15, 0).unwrap());
    }

    #[test]
    fn count_is_clamped_at_both_bounds() {
        assert_eq!(ReminderSettings::from_stored(&stored(Some(15), None, None)).count, 10);
        assert_eq!(ReminderSettings::from_stored(&stored(Some(0), None, None)).count, 1);
        assert_eq!(ReminderSettings::from_stored(&stored(Some(-3), None, None)).count, 1);
    }

    #[test]
    fn malformed_times_fall_back_field_by_field() {
        let settings =
            ReminderSettings::from_stored(&stored(None, Some("25:99"), Some("21:00")));

        assert_eq!(settings.start_time, default_start_time());
        assert_eq!(settings.end_time, NaiveTime::from_hms_opt(21, 0, 0).unwrap());

        let settings = ReminderSettings::from_stored(&stored(None, Some("not a time"), None));

        assert_eq!(settings.start_time, default_start_time());
        assert_eq!(settings.end_time, default_end_time());
    }

    #[test]
    fn stored_roundtrip_preserves_validated_settings() {
        let settings = ReminderSettings {
            enabled: false,
            count: 7,
            start_time: NaiveTime::from_hms_opt(5, 45, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
        };

        let reloaded = ReminderSettings::from_stored(&StoredReminderSettings::from(&settings));

        assert_eq!(reloaded, settings);
    }
}

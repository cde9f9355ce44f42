use chrono::{NaiveTime, Timelike};

use crate::settings::{MAX_REMINDER_COUNT, MIN_REMINDER_COUNT, ReminderSettings};

const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedReminder {
    pub fire_at: NaiveTime,
    pub message_index: usize,
}

pub fn build_plan(settings: &ReminderSettings, pool_len: usize) -> Vec<PlannedReminder> {
    debug_assert!(pool_len > 0, "the remembrance pool is never empty");

    let count = i64::from(settings.count.clamp(MIN_REMINDER_COUNT, MAX_REMINDER_COUNT));
    let start_total = minute_of_day(&settings.start_time);
    let mut end_total = minute_of_day(&settings.end_time);

    // An end bound at or before the start belongs to the next day.
    if end_total <= start_total {
        end_total += MINUTES_PER_DAY;
    }

    let total_minutes = end_total - start_total;

    if count == 1 {
        return vec![PlannedReminder {
            fire_at: time_from_minute_of_day(start_total),
            message_index: 0,
        }];
    }

    // The one-minute floor keeps a degenerate window from collapsing every
    // slot onto the same instant.
    let interval = (total_minutes / (count - 1)).max(1);

    (0..count)
        .map(|i| PlannedReminder {
            fire_at: time_from_minute_of_day((start_total + interval * i) % MINUTES_PER_DAY),
            message_index: (i as usize) % pool_len,
        })
        .collect()
}

fn minute_of_day(time: &NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

fn time_from_minute_of_day(minute_of_day: i64) -> NaiveTime {
    let hour = (minute_of_day / 60) as u32;
    let minute = (minute_of_day % 60) as u32;

    NaiveTime::from_hms_opt(hour, minute, 0)
        .expect("A minute-of-day below 1440 always splits into a valid time.")
}

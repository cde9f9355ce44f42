use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use tokio::{sync::Mutex, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use super::{DailyTrigger, NotificationGateway};

const CANCEL_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemembranceNotification {
    pub fire_at: NaiveTime,
    pub title: String,
    pub body: String,
}

#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    async fn deliver(&self, notification: &RemembranceNotification);
}

pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn deliver(&self, notification: &RemembranceNotification) {
        log::info!("[DELIVER] {}: {}", notification.title, notification.body);
    }
}

struct TriggerTask {
    task_handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl TriggerTask {
    async fn cancel(self, timeout: Duration) {
        self.cancellation_token.cancel();
        let cancel_with_timeout = time::timeout(timeout, self.task_handle);
        let _ = cancel_with_timeout.await;
    }
}

pub struct LocalNotificationGateway {
    sink: Arc<dyn NotificationSink>,
    timezone: Tz,
    tasks: Mutex<Vec<TriggerTask>>,
}

impl LocalNotificationGateway {
    pub fn new(sink: Arc<dyn NotificationSink>, timezone: Tz) -> Self {
        Self {
            sink,
            timezone,
            tasks: Mutex::new(Vec::new()),
        }
    }

    fn spawn_trigger_task(&self, trigger: &DailyTrigger) -> TriggerTask {
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();

        let notification = RemembranceNotification {
            fire_at: trigger.fire_at,
            title: trigger.title.clone(),
            body: trigger.body.clone(),
        };
        let sink = Arc::clone(&self.sink);
        let timezone = self.timezone;

        let task_handle = tokio::spawn(async move {
            run_trigger(task_cancellation_token, notification, timezone, sink).await;
        });

        TriggerTask {
            task_handle,
            cancellation_token,
        }
    }
}

#[async_trait]
impl NotificationGateway for LocalNotificationGateway {
    async fn request_permission(&self) -> bool {
        // In-process delivery has no user consent to ask for.
        true
    }

    async fn cancel_all_daily_triggers(&self) -> anyhow::Result<()> {
        let drained: Vec<TriggerTask> = self.tasks.lock().await.drain(..).collect();
        let removed = drained.len();

        for task in drained {
            task.cancel(CANCEL_TIMEOUT).await;
        }

        if removed > 0 {
            log::info!("[CANCEL] Removed {removed} daily triggers");
        }

        Ok(())
    }

    async fn register_daily_trigger(&self, trigger: &DailyTrigger) -> anyhow::Result<()> {
        let task = self.spawn_trigger_task(trigger);
        self.tasks.lock().await.push(task);

        log::info!(
            "[REGISTER] Daily trigger installed at {}",
            trigger.fire_at.format("%H:%M")
        );

        Ok(())
    }
}

async fn run_trigger(
    cancellation_token: CancellationToken,
    notification: RemembranceNotification,
    timezone: Tz,
    sink: Arc<dyn NotificationSink>,
) {
    let mut target = next_fire_datetime(&notification.fire_at, local_now(timezone));

    loop {
        let delay = (target - local_now(timezone))
            .to_std()
            .unwrap_or(Duration::ZERO);

        tokio::select! {
            _ = cancellation_token.cancelled() => {
                log::debug!(
                    "[TRIGGER] Task for {} cancelled",
                    notification.fire_at.format("%H:%M")
                );
                break;
            }
            _ = time::sleep(delay) => {
                sink.deliver(&notification).await;
                target = target
                    .checked_add_signed(TimeDelta::days(1))
                    .expect("Not realistic to overflow");
            }
        }
    }
}

fn local_now(timezone: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&timezone).naive_local()
}

// A fire time at or before the current time of day belongs to tomorrow.
pub(crate) fn next_fire_datetime(fire_at: &NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let delta = *fire_at - now.time();

    let today = now.date();
    let target_date = if delta <= TimeDelta::zero() {
        today
            .checked_add_signed(TimeDelta::days(1))
            .expect("Not realistic to overflow")
    } else {
        today
    };

    target_date.and_time(*fire_at)
}

#[cfg(test)]
mod next_fire_tests {
    use super::*;

    use chrono::{NaiveDate, Timelike};
    use proptest::prelude::*;
    use proptest_arbitrary_interop::arb;

    #[test]
    fn fire_time_yet_to_come_targets_today() {
        let now = NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        );
        let fire_at = NaiveTime::from_hms_opt(13, 0, 0).unwrap();

        let delay = next_fire_datetime(&fire_at, now) - now;

        assert_eq!(
            delay.num_hours(),
            1,
            "With given constraints the delay should be 1 hour."
        );
    }

    #[test]
    fn fire_time_already_passed_targets_tomorrow() {
        let now = NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        );
        let fire_at = NaiveTime::from_hms_opt(11, 0, 0).unwrap();

        let delay = next_fire_datetime(&fire_at, now) - now;

        assert_eq!(
            delay.num_hours(),
            23,
            "With given constraints, the delay should be 23 hours"
        );
    }

    proptest! {
        #[test]
        fn next_occurrence_is_in_the_future_and_within_a_day(
            now in arb::<NaiveDateTime>(),
            fire_at in arb::<NaiveTime>()
        ) {
            let fire_at = fire_at.with_nanosecond(0).unwrap();
            let now = now.with_nanosecond(0).unwrap();

            let target = next_fire_datetime(&fire_at, now);
            let delay = target - now;

            prop_assert!(target > now, "Target time should always be in the future");
            prop_assert_eq!(target.time(), fire_at, "Target should land on the fire time");
            prop_assert!(
                delay.num_days() <= 1,
                "Delay should be one day or less. delay.days = {}",
                delay.num_days()
            );
        }
    }
}

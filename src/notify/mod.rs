mod local;

pub use local::{
    LocalNotificationGateway, LogNotificationSink, NotificationSink, RemembranceNotification,
};

use async_trait::async_trait;
use chrono::NaiveTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTrigger {
    pub fire_at: NaiveTime,
    pub title: String,
    pub body: String,
}

// Installed triggers are write-only state: cleared wholesale and replaced,
// never read back.
#[async_trait]
pub trait NotificationGateway: Send + Sync + 'static {
    // `false` means the user declined.
    async fn request_permission(&self) -> bool;

    async fn cancel_all_daily_triggers(&self) -> anyhow::Result<()>;

    async fn register_daily_trigger(&self, trigger: &DailyTrigger) -> anyhow::Result<()>;
}

pub struct NoopNotificationGateway;

#[async_trait]
impl NotificationGateway for NoopNotificationGateway {
    async fn request_permission(&self) -> bool {
        true
    }

    async fn cancel_all_daily_triggers(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn register_daily_trigger(&self, _trigger: &DailyTrigger) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::scheduling::ReminderScheduler;
    use crate::settings::ReminderSettings;

    #[tokio::test]
    async fn noop_gateway_accepts_a_full_reschedule() {
        let scheduler = ReminderScheduler::new(Arc::new(NoopNotificationGateway));

        let applied = scheduler
            .reschedule(&ReminderSettings::default())
            .await
            .unwrap();

        assert_eq!(applied.triggers.len(), 3);
    }
}

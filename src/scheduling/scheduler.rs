use std::sync::Arc;

use thiserror::Error;

use crate::notify::{DailyTrigger, NotificationGateway};
use crate::remembrance::{self, NOTIFICATION_TITLE, Remembrance};
use crate::settings::ReminderSettings;

use super::plan::{PlannedReminder, build_plan};

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("notification permission was denied")]
    PermissionDenied,

    #[error("failed to clear previously installed triggers")]
    CancelAll(#[source] anyhow::Error),

    // Not transactional: cancel-all has already taken effect.
    #[error("failed to register daily triggers")]
    Registration(#[source] anyhow::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedSchedule {
    pub triggers: Vec<DailyTrigger>,
}

// Overlapping reschedules are not serialized; the last cancel-all wins.
pub struct ReminderScheduler {
    gateway: Arc<dyn NotificationGateway>,
    pool: &'static [Remembrance],
}

impl ReminderScheduler {
    pub fn new(gateway: Arc<dyn NotificationGateway>) -> Self {
        Self {
            gateway,
            pool: remembrance::DEFAULT_POOL,
        }
    }

    pub async fn reschedule(
        &self,
        settings: &ReminderSettings,
    ) -> Result<AppliedSchedule, ScheduleError> {
        if !settings.enabled {
            log::info!("[RESCHEDULE] Reminders disabled, clearing installed triggers");
            self.gateway
                .cancel_all_daily_triggers()
                .await
                .map_err(ScheduleError::CancelAll)?;

            return Ok(AppliedSchedule::default());
        }

        if !self.gateway.request_permission().await {
            log::warn!("[RESCHEDULE] Permission denied, leaving existing triggers untouched");
            return Err(ScheduleError::PermissionDenied);
        }

        let plan = build_plan(settings, self.pool.len());
        let triggers: Vec<DailyTrigger> = plan.iter().map(|p| self.render_trigger(p)).collect();

        self.gateway
            .cancel_all_daily_triggers()
            .await
            .map_err(ScheduleError::CancelAll)?;

        for trigger in &triggers {
            self.gateway
                .register_daily_trigger(trigger)
                .await
                .map_err(ScheduleError::Registration)?;
        }

        log::info!(
            "[RESCHEDULE] Installed {} daily triggers between {} and {}",
            triggers.len(),
            settings.start_time.format("%H:%M"),
            settings.end_time.format("%H:%M")
        );

        Ok(AppliedSchedule { triggers })
    }

    fn render_trigger(&self, planned: &PlannedReminder) -> DailyTrigger {
        let remembrance = &self.pool[planned.message_index % self.pool.len()];

        DailyTrigger {
            fire_at: planned.fire_at,
            title: NOTIFICATION_TITLE.to_owned(),
            body: remembrance.notification_body(),
        }
    }
}
